//! Parsing contracts shared by the built-in adapters.

use hamlet_frameworks::registry::FrameworkRegistry;
use hamlet_frameworks::{FrameworkAdapter, ParseError};
use hamlet_ir::{HookKind, Modifier, Node};
use std::sync::Arc;

fn adapter(name: &str) -> Arc<dyn FrameworkAdapter> {
    FrameworkRegistry::with_builtins()
        .get(name)
        .expect("built-in adapter")
}

#[test]
fn test_jest_parses_suites_cases_and_hooks() {
    let source = "describe('cart', () => {\n  beforeEach(() => {\n    reset();\n  });\n\n  test('starts empty', () => {\n    expect(cart.size).toBe(0);\n  });\n});\n";
    let file = adapter("jest").parse(source).expect("parses");
    assert_eq!(file.items.len(), 1);
    let Node::Suite(suite) = &file.items[0] else {
        panic!("expected a suite");
    };
    assert_eq!(suite.name, "cart");
    assert_eq!(suite.children.len(), 2);
    let Node::Hook(hook) = &suite.children[0] else {
        panic!("expected a hook first");
    };
    assert_eq!(hook.kind, HookKind::BeforeEach);
    let Node::Case(case) = &suite.children[1] else {
        panic!("expected a case second");
    };
    assert_eq!(case.name, "starts empty");
    assert!(matches!(case.body[0], Node::Assertion(_)));
}

#[test]
fn test_modifiers_survive_parsing() {
    let source = "describe.skip('wip', () => {\n  test.only('focus', () => {\n    expect(1).toBe(1);\n  });\n});\n";
    let file = adapter("jest").parse(source).expect("parses");
    let Node::Suite(suite) = &file.items[0] else {
        panic!("expected a suite");
    };
    assert_eq!(suite.modifier, Modifier::Skip);
    let Node::Case(case) = &suite.children[0] else {
        panic!("expected a case");
    };
    assert_eq!(case.modifier, Modifier::Only);
}

#[test]
fn test_unknown_statements_degrade_to_raw() {
    let source = "test('setup heavy', () => {\n  const fixture = buildFixture({ deep: true });\n  expect(fixture.ok).toBe(true);\n});\n";
    let file = adapter("jest").parse(source).expect("parses");
    let Node::Case(case) = &file.items[0] else {
        panic!("expected a case");
    };
    assert!(matches!(case.body[0], Node::Raw(_)));
    assert!(matches!(case.body[1], Node::Assertion(_)));
}

#[test]
fn test_unclosed_block_is_a_parse_error() {
    let source = "describe('broken', () => {\n  test('x', () => {\n";
    let err = adapter("jest").parse(source).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn test_oversized_source_is_rejected() {
    let big = "x".repeat(hamlet_common::limits::MAX_SOURCE_BYTES + 1);
    let err = adapter("jest").parse(&big).unwrap_err();
    assert!(matches!(err, ParseError::TooLarge { .. }));
}

#[test]
fn test_spans_slice_the_original_source() {
    let source = "test('spans', () => {\n  expect(a).toBe(b);\n});\n";
    let file = adapter("jest").parse(source).expect("parses");
    let Node::Case(case) = &file.items[0] else {
        panic!("expected a case");
    };
    assert_eq!(case.span.slice(source), "test('spans', () => {");
    assert_eq!(case.body[0].span().slice(source), "expect(a).toBe(b);");
}

#[test]
fn test_cypress_parses_command_chains() {
    let source = "it('navigates', () => {\n  cy.visit('/home');\n  cy.get('#menu').click();\n  cy.get('#q').type('rust');\n});\n";
    let file = adapter("cypress").parse(source).expect("parses");
    let Node::Case(case) = &file.items[0] else {
        panic!("expected a case");
    };
    assert_eq!(case.body.len(), 3);
    assert!(case.body.iter().all(|n| matches!(n, Node::Navigation(_))));
}

#[test]
fn test_playwright_parses_page_actions_as_navigation() {
    let source = "test('fills the form', async ({ page }) => {\n  await page.goto('/form');\n  await page.fill('#name', 'Ada');\n  await page.click('#send');\n});\n";
    let file = adapter("playwright").parse(source).expect("parses");
    let Node::Case(case) = &file.items[0] else {
        panic!("expected a case");
    };
    assert!(case.is_async);
    assert_eq!(case.body.len(), 3);
    assert!(case.body.iter().all(|n| matches!(n, Node::Navigation(_))));
}

#[test]
fn test_mocha_parses_chai_assertions() {
    let source = "const { expect } = require('chai');\n\ndescribe('sum', () => {\n  it('adds', () => {\n    expect(sum(1, 2)).to.equal(3);\n  });\n});\n";
    let file = adapter("mocha").parse(source).expect("parses");
    assert_eq!(file.imports.len(), 1);
    assert_eq!(file.imports[0].source, "chai");
    let Node::Suite(suite) = &file.items[0] else {
        panic!("expected a suite");
    };
    let Node::Case(case) = &suite.children[0] else {
        panic!("expected a case");
    };
    assert!(matches!(case.body[0], Node::Assertion(_)));
}
