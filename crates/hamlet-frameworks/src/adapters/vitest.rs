//! Vitest adapter.
//!
//! Vitest's surface is deliberately Jest-compatible, so parsing is shared
//! with the Jest adapter; the differences are imports (no globals by
//! default), the `vi` mock namespace, and the removed `done` callback.

use hamlet_ir::{HookKind, Node, Span, TestFile};

use super::{emit_case_opener, emit_hook_opener, emit_import, emit_suite_opener, rewrite_api};
use crate::parser::{parse_source, SyntaxProfile};
use crate::{
    matchers, FrameworkAdapter, FrameworkKind, NodeEmission, ParseError, UnconvertibleEntry,
};

pub struct VitestAdapter;

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

fn is_done_callback_case(node: &Node) -> bool {
    matches!(node, Node::Case(case) if case.uses_done_callback)
}

const CATALOG: &[UnconvertibleEntry] = &[UnconvertibleEntry {
    id: "DONE-CALLBACK",
    message: "Vitest does not support the `done` completion callback",
    manual_action: "rewrite the test to return a promise or use async/await",
    detector: is_done_callback_case,
}];

impl FrameworkAdapter for VitestAdapter {
    fn name(&self) -> &'static str {
        "vitest"
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Unit
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".test.ts", ".test.js", ".spec.ts", ".spec.js"]
    }

    fn detect(&self, source: &str) -> u8 {
        let mut score = 0u32;
        if source.contains("from 'vitest'") || source.contains("from \"vitest\"") {
            score += 60;
        }
        if source.contains("vi.") {
            score += 30;
        }
        if source.contains("describe(") || source.contains("it(") || source.contains("test(") {
            score += 20;
        }
        if source.contains("expect(") {
            score += 20;
        }
        if source.contains("@jest/globals") || source.contains("jest.") {
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
                &[("@jest/globals", "vitest")],
                |spec| {
                    if spec == "jest" {
                        "vi".to_string()
                    } else {
                        spec.to_string()
                    }
                },
            )),
            Node::Suite(suite) => NodeEmission::mapped(emit_suite_opener(suite, "describe")),
            Node::Case(case) if case.uses_done_callback => NodeEmission::NotSupported,
            Node::Case(case) => NodeEmission::mapped(emit_case_opener(case, "it", "()", false)),
            Node::Hook(hook) => NodeEmission::mapped(emit_hook_opener(
                hook,
                &["beforeEach", "afterEach", "beforeAll", "afterAll"],
                "()",
                false,
            )),
            Node::Assertion(assertion) => match matchers::emit_jest_assertion(assertion) {
                Some(code) if assertion.matcher == matchers::SNAPSHOT => NodeEmission::warned(
                    code,
                    "snapshot files are stored and named differently under Vitest; regenerate them",
                ),
                Some(code) => NodeEmission::mapped(code),
                None => NodeEmission::NotSupported,
            },
            Node::Navigation(_) => NodeEmission::NotSupported,
            Node::Raw(raw) => match rewrite_api(&raw.text, "jest.", "vi.") {
                Some(rewritten) => NodeEmission::mapped(rewritten),
                None => NodeEmission::mapped(raw.text.clone()),
            },
            Node::Comment(comment) => NodeEmission::mapped(format!("// {}", comment.text)),
        }
    }

    fn required_imports(&self) -> &'static [&'static str] {
        &["import { describe, it, expect } from 'vitest';"]
    }

    fn unconvertible_catalog(&self) -> &'static [UnconvertibleEntry] {
        CATALOG
    }
}
