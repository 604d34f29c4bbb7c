//! Mocha (+Chai) adapter.
//!
//! Mocha's BDD interface with Chai `expect` assertions. This adapter does
//! not support whole-file IR emission (`ir_emission` is false): routes
//! targeting Mocha exercise the IR-guided patch stage instead, which is the
//! honest representation of what a Mocha conversion can promise — Mocha has
//! no mock framework, no snapshots, and no promise assertion sugar without
//! plugins.

use hamlet_ir::{AsyncQualifier, HookKind, Node, Span, TestFile};

use super::{emit_case_opener, emit_hook_opener, emit_suite_opener};
use crate::parser::{parse_source, SyntaxProfile};
use crate::{
    matchers, FrameworkAdapter, FrameworkKind, NodeEmission, ParseError, UnconvertibleEntry,
};

pub struct MochaAdapter;

const HOOKS: &[(&str, HookKind)] = &[
    ("beforeEach", HookKind::BeforeEach),
    ("afterEach", HookKind::AfterEach),
    ("before", HookKind::BeforeAll),
    ("after", HookKind::AfterAll),
];

fn parse_statement(trimmed: &str, span: Span) -> Option<Node> {
    matchers::parse_chai_assertion(trimmed, span)
}

const PROFILE: SyntaxProfile = SyntaxProfile {
    suite_keywords: &["describe", "context"],
    case_keywords: &["it", "specify"],
    hooks: HOOKS,
    parse_statement,
};

fn is_snapshot_assertion(node: &Node) -> bool {
    matches!(node, Node::Assertion(a) if a.matcher == matchers::SNAPSHOT)
}

fn is_mock_assertion(node: &Node) -> bool {
    matches!(node, Node::Assertion(a)
        if a.matcher == matchers::CALLED || a.matcher == matchers::CALLED_WITH)
}

fn is_async_assertion(node: &Node) -> bool {
    matches!(node, Node::Assertion(a) if a.async_qualifier != AsyncQualifier::None)
}

fn is_module_mock(node: &Node) -> bool {
    matches!(node, Node::Raw(raw)
        if raw.text.contains("jest.mock(") || raw.text.contains("vi.mock("))
}

fn is_mock_fn(node: &Node) -> bool {
    matches!(node, Node::Raw(raw)
        if raw.text.contains("jest.") || raw.text.contains("vi."))
}

const CATALOG: &[UnconvertibleEntry] = &[
    UnconvertibleEntry {
        id: "SNAPSHOT",
        message: "Chai has no snapshot matcher",
        manual_action: "assert on explicit expected values instead",
        detector: is_snapshot_assertion,
    },
    UnconvertibleEntry {
        id: "MOCK-ASSERT",
        message: "call-count assertions require a mocking library such as Sinon",
        manual_action: "add sinon and assert via sinon.assert or spy properties",
        detector: is_mock_assertion,
    },
    UnconvertibleEntry {
        id: "ASYNC-ASSERT",
        message: "promise assertions require the chai-as-promised plugin",
        manual_action: "add chai-as-promised or await the value before asserting",
        detector: is_async_assertion,
    },
    UnconvertibleEntry {
        id: "MODULE-MOCK",
        message: "module mocking has no Mocha equivalent",
        manual_action: "restructure with dependency injection or proxyquire",
        detector: is_module_mock,
    },
    UnconvertibleEntry {
        id: "MOCK-FN",
        message: "mock function APIs have no Mocha equivalent",
        manual_action: "use sinon spies/stubs instead",
        detector: is_mock_fn,
    },
];

impl FrameworkAdapter for MochaAdapter {
    fn name(&self) -> &'static str {
        "mocha"
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Unit
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".spec.js", ".test.js"]
    }

    fn detect(&self, source: &str) -> u8 {
        let mut score = 0u32;
        if source.contains("require('chai')")
            || source.contains("from 'chai'")
            || source.contains(".to.equal(")
            || source.contains(".to.be.")
            || source.contains(".to.deep.")
        {
            score += 60;
        }
        if source.contains("describe(") || source.contains("context(") {
            score += 20;
        }
        if source.contains("before(") || source.contains("after(") {
            score += 20;
        }
        score.min(100) as u8
    }

    fn parse(&self, source: &str) -> Result<TestFile, ParseError> {
        parse_source(source, &PROFILE)
    }

    fn emit_node(&self, node: &Node) -> NodeEmission {
        match node {
            Node::Import(import) => {
                // Jest/Vitest global imports have no Mocha counterpart;
                // what a Chai test file needs instead is `expect`.
                if import.source == "@jest/globals" || import.source == "vitest" {
                    NodeEmission::mapped("const { expect } = require('chai');")
                } else if import.side_effect_only {
                    NodeEmission::mapped(format!(
                        "require({});",
                        crate::scan::quote(&import.source)
                    ))
                } else {
                    NodeEmission::mapped(format!(
                        "const {{ {} }} = require({});",
                        import.specifiers.join(", "),
                        crate::scan::quote(&import.source)
                    ))
                }
            }
            Node::Suite(suite) => NodeEmission::mapped(emit_suite_opener(suite, "describe")),
            Node::Case(case) => NodeEmission::mapped(emit_case_opener(case, "it", "()", false)),
            Node::Hook(hook) => NodeEmission::mapped(emit_hook_opener(
                hook,
                &["beforeEach", "afterEach", "before", "after"],
                "()",
                false,
            )),
            Node::Assertion(assertion) => {
                if assertion.async_qualifier != AsyncQualifier::None {
                    return NodeEmission::NotSupported;
                }
                match matchers::emit_chai_assertion(assertion) {
                    Some((code, None)) => NodeEmission::mapped(code),
                    Some((code, Some(advisory))) => NodeEmission::warned(code, advisory),
                    None => NodeEmission::NotSupported,
                }
            }
            Node::Navigation(_) => NodeEmission::NotSupported,
            Node::Raw(raw) => {
                if raw.text.contains("jest.") || raw.text.contains("vi.") {
                    NodeEmission::NotSupported
                } else {
                    NodeEmission::mapped(raw.text.clone())
                }
            }
            Node::Comment(comment) => NodeEmission::mapped(format!("// {}", comment.text)),
        }
    }

    fn ir_emission(&self) -> bool {
        false
    }

    fn unconvertible_catalog(&self) -> &'static [UnconvertibleEntry] {
        CATALOG
    }
}
