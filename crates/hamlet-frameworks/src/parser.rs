//! Shared structural parser for JavaScript/TypeScript test files.
//!
//! All supported frameworks share the same block structure (suite and case
//! calls taking a closure, hooks, `});` closers); what differs per framework
//! is the keyword set and how statement lines inside a case body are read.
//! Each adapter supplies a [`SyntaxProfile`] with those specifics and this
//! module does the structural work: imports, comments, nesting, provenance
//! spans, and degradation of unrecognized lines to `RawCode`.

use hamlet_common::limits::{MAX_NESTING_DEPTH, MAX_SOURCE_BYTES};
use hamlet_ir::{
    Comment, CommentAttachment, Hook, HookKind, ImportStatement, Modifier, Node, RawCode, Span,
    TestCase, TestFile, TestSuite,
};

use crate::scan;
use crate::ParseError;

/// Framework-specific syntax knobs consumed by [`parse_source`].
pub struct SyntaxProfile {
    /// Suite-opening callees, e.g. `["describe"]`.
    pub suite_keywords: &'static [&'static str],
    /// Case-opening callees, e.g. `["it", "test"]`.
    pub case_keywords: &'static [&'static str],
    /// Hook callees and their kinds, e.g. `("beforeEach", HookKind::BeforeEach)`.
    pub hooks: &'static [(&'static str, HookKind)],
    /// Parse one trimmed statement line into an assertion/navigation node.
    /// Returning `None` degrades the line to `RawCode`.
    pub parse_statement: fn(&str, Span) -> Option<Node>,
}

enum Container {
    Suite(TestSuite),
    Case(TestCase),
    Hook(Hook),
}

impl Container {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Container::Suite(s) => &mut s.children,
            Container::Case(c) => &mut c.body,
            Container::Hook(h) => &mut h.body,
        }
    }

    fn into_node(self) -> Node {
        match self {
            Container::Suite(s) => Node::Suite(s),
            Container::Case(c) => Node::Case(c),
            Container::Hook(h) => Node::Hook(h),
        }
    }
}

struct OpenBlock {
    container: Container,
    /// Net braces opened by raw lines inside this block; closers are
    /// swallowed as raw text until this drains back to zero.
    extra_braces: i32,
}

/// Parse `source` with the given profile.
pub fn parse_source(source: &str, profile: &SyntaxProfile) -> Result<TestFile, ParseError> {
    if source.len() > MAX_SOURCE_BYTES {
        return Err(ParseError::TooLarge {
            limit: MAX_SOURCE_BYTES,
        });
    }

    let mut file = TestFile::default();
    let mut stack: Vec<OpenBlock> = Vec::new();
    // Braces opened by raw lines outside any suite/case, e.g. helper
    // function bodies at file level.
    let mut top_extra: i32 = 0;
    let mut offset: u32 = 0;
    let mut in_block_comment = false;

    for (idx, line) in source.split('\n').enumerate() {
        let line_no = (idx + 1) as u32;
        let line_start = offset;
        offset += line.len() as u32 + 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = scan::indent_of(line).len() as u32;
        let span = Span::new(line_start + indent, line_start + line.len() as u32, line_no);

        // Block comments: only whole-line forms are modeled; anything mixing
        // code and a block comment on one line degrades to raw.
        if in_block_comment {
            let text = trimmed
                .trim_end_matches("*/")
                .trim_start_matches('*')
                .trim()
                .to_string();
            if trimmed.ends_with("*/") {
                in_block_comment = false;
            }
            push_comment(&mut file, &mut stack, text, span);
            continue;
        }
        if trimmed.starts_with("/*") {
            let text = trimmed
                .trim_start_matches("/*")
                .trim_end_matches("*/")
                .trim_start_matches('*')
                .trim()
                .to_string();
            if !trimmed.ends_with("*/") {
                in_block_comment = true;
            }
            push_comment(&mut file, &mut stack, text, span);
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("//") {
            push_comment(&mut file, &mut stack, text.trim().to_string(), span);
            continue;
        }

        // Imports at the top level.
        if stack.is_empty() {
            if let Some(import) = parse_import(trimmed, span) {
                file.imports.push(import);
                continue;
            }
        }

        // Closers, accounting for braces opened by raw statement lines.
        if scan::is_block_closer(trimmed) {
            let extra = match stack.last_mut() {
                Some(open) => &mut open.extra_braces,
                None => &mut top_extra,
            };
            if *extra > 0 {
                *extra -= 1;
                let raw = Node::Raw(RawCode {
                    text: trimmed.to_string(),
                    span,
                });
                attach(&mut file, &mut stack, raw);
            } else if let Some(block) = stack.pop() {
                let node = block.container.into_node();
                attach(&mut file, &mut stack, node);
            } else {
                return Err(ParseError::Syntax {
                    line: line_no as usize,
                    message: format!("unmatched block closer `{trimmed}`"),
                });
            }
            continue;
        }

        // Suite / case / hook openers.
        if let Some(container) = parse_opener(trimmed, span, profile) {
            if stack.len() >= MAX_NESTING_DEPTH {
                return Err(ParseError::TooDeep {
                    limit: MAX_NESTING_DEPTH,
                    line: line_no as usize,
                });
            }
            stack.push(OpenBlock {
                container,
                extra_braces: 0,
            });
            continue;
        }

        // Statement lines: framework-specific first, then raw.
        let node = (profile.parse_statement)(trimmed, span).unwrap_or_else(|| {
            Node::Raw(RawCode {
                text: trimmed.to_string(),
                span,
            })
        });
        let delta = match &node {
            Node::Raw(raw) => scan::brace_delta(&raw.text),
            _ => 0,
        };
        match stack.last_mut() {
            Some(open) => {
                open.extra_braces = (open.extra_braces + delta).max(0);
                open.container.children_mut().push(node);
            }
            None => {
                top_extra = (top_extra + delta).max(0);
                file.items.push(node);
            }
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::UnexpectedEof { open: stack.len() });
    }
    Ok(file)
}

fn attach(file: &mut TestFile, stack: &mut [OpenBlock], node: Node) {
    match stack.last_mut() {
        Some(open) => open.container.children_mut().push(node),
        None => file.items.push(node),
    }
}

fn push_comment(file: &mut TestFile, stack: &mut [OpenBlock], text: String, span: Span) {
    if stack.is_empty() && file.items.is_empty() {
        file.leading_comments.push(Comment {
            text,
            attachment: CommentAttachment::FileLevel,
            span,
        });
    } else {
        attach(
            file,
            stack,
            Node::Comment(Comment {
                text,
                attachment: CommentAttachment::Preceding,
                span,
            }),
        );
    }
}

fn parse_import(trimmed: &str, span: Span) -> Option<ImportStatement> {
    if let Some(rest) = trimmed.strip_prefix("import ") {
        // Side-effect import: `import 'module';`
        if rest.starts_with('\'') || rest.starts_with('"') {
            let (source, _) = scan::string_arg(rest)?;
            return Some(ImportStatement {
                specifiers: Vec::new(),
                source,
                side_effect_only: true,
                span,
            });
        }
        let from = rest.find(" from ")?;
        let (source, _) = scan::string_arg(&rest[from..])?;
        let clause = rest[..from].trim();
        let specifiers: Vec<String> = clause
            .trim_start_matches('{')
            .trim_end_matches('}')
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return Some(ImportStatement {
            specifiers,
            source,
            side_effect_only: false,
            span,
        });
    }
    // CommonJS: `const chai = require('chai');`
    if (trimmed.starts_with("const ") || trimmed.starts_with("let ") || trimmed.starts_with("var "))
        && trimmed.contains("require(")
    {
        let eq = trimmed.find('=')?;
        let clause = trimmed[..eq]
            .trim_start_matches("const ")
            .trim_start_matches("let ")
            .trim_start_matches("var ")
            .trim();
        let (source, _) = scan::string_arg(&trimmed[eq..])?;
        let specifiers: Vec<String> = clause
            .trim_start_matches('{')
            .trim_end_matches('}')
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return Some(ImportStatement {
            specifiers,
            source,
            side_effect_only: false,
            span,
        });
    }
    None
}

fn parse_opener(trimmed: &str, span: Span, profile: &SyntaxProfile) -> Option<Container> {
    // Openers must actually open a block on this line.
    if scan::brace_delta(trimmed) <= 0 {
        return None;
    }

    for &(hook_name, kind) in profile.hooks {
        if callee_matches(trimmed, hook_name).is_some() {
            return Some(Container::Hook(Hook {
                kind,
                body: Vec::new(),
                span,
            }));
        }
    }

    for &kw in profile.suite_keywords {
        if let Some(modifier) = callee_matches(trimmed, kw) {
            let (name, _) = scan::string_arg(trimmed)?;
            return Some(Container::Suite(TestSuite {
                name,
                children: Vec::new(),
                modifier,
                span,
            }));
        }
    }

    for &kw in profile.case_keywords {
        if let Some(modifier) = callee_matches(trimmed, kw) {
            let (name, rest_at) = scan::string_arg(trimmed)?;
            let rest = &trimmed[rest_at..];
            return Some(Container::Case(TestCase {
                name,
                body: Vec::new(),
                modifier,
                is_async: rest.contains("async"),
                uses_done_callback: has_done_parameter(rest),
                span,
            }));
        }
    }

    None
}

/// Check that `trimmed` is a call to `keyword` (optionally with a
/// `.skip`/`.only` modifier) and return the modifier.
fn callee_matches(trimmed: &str, keyword: &str) -> Option<Modifier> {
    let rest = trimmed.strip_prefix(keyword)?;
    if rest.starts_with('(') {
        Some(Modifier::None)
    } else if rest.starts_with(".skip(") {
        Some(Modifier::Skip)
    } else if rest.starts_with(".only(") {
        Some(Modifier::Only)
    } else {
        None
    }
}

/// Whether the callback parameter list declares a completion callback, as in
/// `it('x', (done) => {` or `it('x', function (done) {`.
fn has_done_parameter(rest: &str) -> bool {
    let Some(open) = rest.find('(') else {
        return false;
    };
    let Some(close) = scan::matching_paren(rest, open) else {
        return false;
    };
    rest[open + 1..close]
        .split(',')
        .any(|p| p.trim() == "done")
}
