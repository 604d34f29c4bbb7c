//! IR node definitions.

use hamlet_common::span::Span;

/// Root of one parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestFile {
    pub imports: Vec<ImportStatement>,
    /// Comments that precede any test construct (license headers, file docs).
    pub leading_comments: Vec<Comment>,
    /// Top-level suites/cases/hooks in source order.
    pub items: Vec<Node>,
}

/// Any node that can appear in a suite or case body.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Import(ImportStatement),
    Suite(TestSuite),
    Case(TestCase),
    Hook(Hook),
    Assertion(Assertion),
    Navigation(Navigation),
    Raw(RawCode),
    Comment(Comment),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Import(n) => n.span,
            Node::Suite(n) => n.span,
            Node::Case(n) => n.span,
            Node::Hook(n) => n.span,
            Node::Assertion(n) => n.span,
            Node::Navigation(n) => n.span,
            Node::Raw(n) => n.span,
            Node::Comment(n) => n.span,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Import(_) => "import",
            Node::Suite(_) => "suite",
            Node::Case(_) => "case",
            Node::Hook(_) => "hook",
            Node::Assertion(_) => "assertion",
            Node::Navigation(_) => "navigation",
            Node::Raw(_) => "raw",
            Node::Comment(_) => "comment",
        }
    }

    /// Whether this node opens a block that contains children.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Suite(_) | Node::Case(_) | Node::Hook(_))
    }
}

/// A module/package reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportStatement {
    /// Imported names; empty for side-effect-only imports.
    pub specifiers: Vec<String>,
    /// Module specifier, e.g. `@jest/globals`.
    pub source: String,
    pub side_effect_only: bool,
    pub span: Span,
}

/// Skip/focus modifiers on suites and cases.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Modifier {
    #[default]
    None,
    Skip,
    Only,
}

/// A named grouping of cases; nestable.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSuite {
    pub name: String,
    /// Suites, cases and hooks in source order. Order is significant.
    pub children: Vec<Node>,
    pub modifier: Modifier,
    pub span: Span,
}

/// One test.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    pub name: String,
    /// Body statements in source order. Order is significant.
    pub body: Vec<Node>,
    pub modifier: Modifier,
    pub is_async: bool,
    /// Completion signaled via a `done` callback rather than a returned
    /// promise; some target frameworks have no equivalent.
    pub uses_done_callback: bool,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HookKind {
    BeforeEach,
    AfterEach,
    BeforeAll,
    AfterAll,
}

/// Setup/teardown logic attached to a suite or to the file.
#[derive(Clone, Debug, PartialEq)]
pub struct Hook {
    pub kind: HookKind,
    pub body: Vec<Node>,
    pub span: Span,
}

/// Async qualifier on an assertion subject.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AsyncQualifier {
    #[default]
    None,
    Resolves,
    Rejects,
}

/// An expectation.
///
/// `matcher` holds a framework-neutral matcher id when the source parser
/// recognized the matcher (e.g. `equal`, `deep-equal`, `contain`); an
/// unrecognized matcher degrades the whole statement to [`RawCode`] instead,
/// so consumers may assume the matcher id is from the shared vocabulary.
#[derive(Clone, Debug, PartialEq)]
pub struct Assertion {
    /// Source text of the asserted expression (or a selector for browser
    /// assertions).
    pub subject: String,
    pub matcher: String,
    pub args: Vec<String>,
    pub negated: bool,
    pub async_qualifier: AsyncQualifier,
    pub span: Span,
}

/// A browser/automation action.
#[derive(Clone, Debug, PartialEq)]
pub struct Navigation {
    pub action: NavigationAction,
    /// Target selector, where the action has one.
    pub target: Option<String>,
    pub args: Vec<String>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationAction {
    Visit,
    Click,
    Type,
    Wait,
    Select,
    Check,
    Uncheck,
    Hover,
    Press,
    Screenshot,
    /// An action outside the shared vocabulary; the string is the original
    /// method name.
    Custom(String),
}

/// Verbatim original text; the escape hatch for anything unmodeled.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCode {
    pub text: String,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommentAttachment {
    /// Attached to the next node in source order.
    Preceding,
    /// File-level commentary not tied to a construct.
    FileLevel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    /// Text without the comment delimiters.
    pub text: String,
    pub attachment: CommentAttachment,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_span_dispatch() {
        let span = Span::new(3, 9, 2);
        let node = Node::Raw(RawCode {
            text: "foo();".to_string(),
            span,
        });
        assert_eq!(node.span(), span);
        assert_eq!(node.kind_name(), "raw");
        assert!(!node.is_container());
    }

    #[test]
    fn test_container_nodes() {
        let suite = Node::Suite(TestSuite {
            name: "s".to_string(),
            children: vec![],
            modifier: Modifier::None,
            span: Span::empty(),
        });
        assert!(suite.is_container());
    }

    #[test]
    fn test_child_order_is_preserved_by_value() {
        // The tree is plain owned data; cloning must not reorder children.
        let case = TestCase {
            name: "t".to_string(),
            body: vec![
                Node::Raw(RawCode {
                    text: "first();".to_string(),
                    span: Span::empty(),
                }),
                Node::Raw(RawCode {
                    text: "second();".to_string(),
                    span: Span::empty(),
                }),
            ],
            modifier: Modifier::None,
            is_async: false,
            uses_done_callback: false,
            span: Span::empty(),
        };
        let cloned = case.clone();
        assert_eq!(case, cloned);
        match (&cloned.body[0], &cloned.body[1]) {
            (Node::Raw(a), Node::Raw(b)) => {
                assert_eq!(a.text, "first();");
                assert_eq!(b.text, "second();");
            }
            _ => panic!("unexpected node kinds"),
        }
    }
}
