//! Jest adapter.

use hamlet_ir::{HookKind, Node, Span, TestFile};

use super::{emit_case_opener, emit_hook_opener, emit_import, emit_suite_opener, rewrite_api};
use crate::parser::{parse_source, SyntaxProfile};
use crate::{matchers, FrameworkAdapter, FrameworkKind, NodeEmission, ParseError};

pub struct JestAdapter;

const HOOKS: &[(&str, HookKind)] = &[
    ("beforeEach", HookKind::BeforeEach),
    ("afterEach", HookKind::AfterEach),
    ("beforeAll", HookKind::BeforeAll),
    ("afterAll", HookKind::AfterAll),
];

fn parse_statement(trimmed: &str, span: Span) -> Option<Node> {
    matchers::parse_jest_assertion(trimmed, span)
}

const PROFILE: SyntaxProfile = SyntaxProfile {
    suite_keywords: &["describe"],
    case_keywords: &["test", "it"],
    hooks: HOOKS,
    parse_statement,
};

impl FrameworkAdapter for JestAdapter {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Unit
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".test.js", ".test.ts", ".spec.js", ".spec.ts"]
    }

    fn detect(&self, source: &str) -> u8 {
        let mut score = 0u32;
        if source.contains("@jest/globals") || source.contains("jest.") {
            score += 50;
        }
        if source.contains("describe(") || source.contains("it(") || source.contains("test(") {
            score += 25;
        }
        if source.contains("expect(") {
            score += 25;
        }
        if source.contains("vitest") || source.contains("vi.") {
            score = score.saturating_sub(40);
        }
        score.min(100) as u8
    }

    fn parse(&self, source: &str) -> Result<TestFile, ParseError> {
        parse_source(source, &PROFILE)
    }

    fn emit_node(&self, node: &Node) -> NodeEmission {
        match node {
            Node::Import(import) => NodeEmission::mapped(emit_import(
                import,
                &[("vitest", "@jest/globals")],
                |spec| {
                    if spec == "vi" {
                        "jest".to_string()
                    } else {
                        spec.to_string()
                    }
                },
            )),
            Node::Suite(suite) => NodeEmission::mapped(emit_suite_opener(suite, "describe")),
            Node::Case(case) => NodeEmission::mapped(emit_case_opener(case, "it", "()", false)),
            Node::Hook(hook) => NodeEmission::mapped(emit_hook_opener(
                hook,
                &["beforeEach", "afterEach", "beforeAll", "afterAll"],
                "()",
                false,
            )),
            Node::Assertion(assertion) => match matchers::emit_jest_assertion(assertion) {
                Some(code) => NodeEmission::mapped(code),
                None => NodeEmission::NotSupported,
            },
            Node::Navigation(_) => NodeEmission::NotSupported,
            Node::Raw(raw) => match rewrite_api(&raw.text, "vi.", "jest.") {
                Some(rewritten) => NodeEmission::mapped(rewritten),
                None => NodeEmission::mapped(raw.text.clone()),
            },
            Node::Comment(comment) => NodeEmission::mapped(format!("// {}", comment.text)),
        }
    }
}
