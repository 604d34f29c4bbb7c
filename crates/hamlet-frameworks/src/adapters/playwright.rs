//! Playwright adapter.
//!
//! Playwright test files use `test.describe`/`test` with async callbacks
//! receiving the `page` fixture, `page.*` actions, and web-first
//! `expect(page.locator(...))` assertions.

use hamlet_ir::{
    Assertion, AsyncQualifier, HookKind, Navigation, NavigationAction, Node, Span, TestFile,
};

use super::{emit_case_opener, emit_hook_opener, emit_import, emit_suite_opener};
use crate::parser::{parse_source, SyntaxProfile};
use crate::scan::{matching_paren, quote, split_args, string_arg, unquote};
use crate::{
    matchers, FrameworkAdapter, FrameworkKind, NodeEmission, ParseError, UnconvertibleEntry,
};

pub struct PlaywrightAdapter;

const HOOKS: &[(&str, HookKind)] = &[
    ("test.beforeEach", HookKind::BeforeEach),
    ("test.afterEach", HookKind::AfterEach),
    ("test.beforeAll", HookKind::BeforeAll),
    ("test.afterAll", HookKind::AfterAll),
];

fn parse_statement(trimmed: &str, span: Span) -> Option<Node> {
    let rest = trimmed.strip_prefix("await ").unwrap_or(trimmed);
    if rest.starts_with("page.") {
        return parse_page_action(rest, span);
    }
    if rest.starts_with("expect(page.locator(") {
        return parse_locator_assertion(rest, span);
    }
    matchers::parse_jest_assertion(trimmed, span)
}

fn parse_page_action(rest: &str, span: Span) -> Option<Node> {
    let rest = rest.strip_prefix("page.")?;
    let paren = rest.find('(')?;
    let method = &rest[..paren];
    let close = matching_paren(rest, paren)?;
    if !rest[close + 1..].trim_end_matches(';').trim().is_empty() {
        return None; // chained calls stay raw
    }
    let mut args = split_args(&rest[paren + 1..close]);

    // Most page actions take the selector as their first argument.
    let mut take_selector = || {
        if args.is_empty() {
            None
        } else {
            Some(unquote(&args.remove(0)))
        }
    };

    let (action, target) = match method {
        "goto" => (NavigationAction::Visit, None),
        "click" => (NavigationAction::Click, take_selector()),
        "fill" => (NavigationAction::Type, take_selector()),
        "waitForTimeout" => (NavigationAction::Wait, None),
        "selectOption" => (NavigationAction::Select, take_selector()),
        "check" => (NavigationAction::Check, take_selector()),
        "uncheck" => (NavigationAction::Uncheck, take_selector()),
        "hover" => (NavigationAction::Hover, take_selector()),
        "press" => (NavigationAction::Press, take_selector()),
        "screenshot" => (NavigationAction::Screenshot, None),
        _ => return None,
    };
    Some(Node::Navigation(Navigation {
        action,
        target,
        args,
        span,
    }))
}

fn parse_locator_assertion(rest: &str, span: Span) -> Option<Node> {
    let rest = rest.strip_prefix("expect")?;
    let close = matching_paren(rest, 0)?;
    let subject_expr = &rest[1..close];
    let (selector, _) = string_arg(subject_expr)?;
    let mut chain = &rest[close + 1..];

    let mut negated = false;
    if let Some(r) = chain.strip_prefix(".not") {
        negated = true;
        chain = r;
    }
    let chain = chain.strip_prefix('.')?;
    let paren = chain.find('(')?;
    let matcher_close = matching_paren(chain, paren)?;
    let args = split_args(&chain[paren + 1..matcher_close]);
    let id = match &chain[..paren] {
        "toBeVisible" => matchers::VISIBLE,
        "toContainText" => matchers::CONTAIN_TEXT,
        "toHaveValue" => matchers::HAVE_VALUE,
        "toBeChecked" => matchers::CHECKED,
        _ => return None,
    };
    Some(Node::Assertion(Assertion {
        subject: selector,
        matcher: id.to_string(),
        args,
        negated,
        async_qualifier: AsyncQualifier::None,
        span,
    }))
}

const PROFILE: SyntaxProfile = SyntaxProfile {
    suite_keywords: &["test.describe", "describe"],
    case_keywords: &["test", "it"],
    hooks: HOOKS,
    parse_statement,
};

fn is_cy_intercept(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("cy.intercept"))
}

fn is_cy_fixture(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("cy.fixture"))
}

fn is_cy_alias_wait(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("cy.wait('@"))
}

fn is_cy_custom_command(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("Cypress.Commands"))
}

fn is_cy_chain(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("cy."))
}

fn is_done_callback_case(node: &Node) -> bool {
    matches!(node, Node::Case(case) if case.uses_done_callback)
}

const CATALOG: &[UnconvertibleEntry] = &[
    UnconvertibleEntry {
        id: "CY-INTERCEPT",
        message: "cy.intercept has no direct Playwright equivalent",
        manual_action: "rewrite network interception with page.route()",
        detector: is_cy_intercept,
    },
    UnconvertibleEntry {
        id: "CY-ALIAS-WAIT",
        message: "waiting on an intercept alias has no Playwright equivalent",
        manual_action: "await page.waitForResponse() with a URL predicate",
        detector: is_cy_alias_wait,
    },
    UnconvertibleEntry {
        id: "CY-FIXTURE",
        message: "cy.fixture loading has no Playwright equivalent",
        manual_action: "read the fixture file directly or use test.use()",
        detector: is_cy_fixture,
    },
    UnconvertibleEntry {
        id: "CY-COMMAND",
        message: "custom Cypress commands have no Playwright equivalent",
        manual_action: "extract the command body into a helper function",
        detector: is_cy_custom_command,
    },
    UnconvertibleEntry {
        id: "CY-CHAIN",
        message: "Cypress command chain has no direct Playwright equivalent",
        manual_action: "rewrite using page.* APIs",
        detector: is_cy_chain,
    },
    UnconvertibleEntry {
        id: "DONE-CALLBACK",
        message: "Playwright tests do not take a `done` completion callback",
        manual_action: "rewrite the test body with async/await",
        detector: is_done_callback_case,
    },
];

impl FrameworkAdapter for PlaywrightAdapter {
    fn name(&self) -> &'static str {
        "playwright"
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Browser
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".spec.ts", ".spec.js"]
    }

    fn detect(&self, source: &str) -> u8 {
        let mut score = 0u32;
        if source.contains("@playwright/test") {
            score += 60;
        }
        if source.contains("page.") {
            score += 30;
        }
        if source.contains("test(") || source.contains("test.describe(") {
            score += 10;
        }
        if source.contains("cy.") {
            score = score.saturating_sub(50);
        }
        score.min(100) as u8
    }

    fn parse(&self, source: &str) -> Result<TestFile, ParseError> {
        parse_source(source, &PROFILE)
    }

    fn emit_node(&self, node: &Node) -> NodeEmission {
        match node {
            Node::Import(import) => NodeEmission::mapped(emit_import(import, &[], str::to_string)),
            Node::Suite(suite) => NodeEmission::mapped(emit_suite_opener(suite, "test.describe")),
            Node::Case(case) if case.uses_done_callback => NodeEmission::NotSupported,
            Node::Case(case) => {
                NodeEmission::mapped(emit_case_opener(case, "test", "({ page })", true))
            }
            Node::Hook(hook) => NodeEmission::mapped(emit_hook_opener(
                hook,
                &[
                    "test.beforeEach",
                    "test.afterEach",
                    "test.beforeAll",
                    "test.afterAll",
                ],
                "({ page })",
                true,
            )),
            Node::Assertion(assertion) => emit_assertion(assertion),
            Node::Navigation(nav) => emit_navigation(nav),
            Node::Raw(raw) => {
                if raw.text.contains("cy.") || raw.text.contains("Cypress.") {
                    NodeEmission::NotSupported
                } else {
                    NodeEmission::mapped(raw.text.clone())
                }
            }
            Node::Comment(comment) => NodeEmission::mapped(format!("// {}", comment.text)),
        }
    }

    fn required_imports(&self) -> &'static [&'static str] {
        &["import { test, expect } from '@playwright/test';"]
    }

    fn unconvertible_catalog(&self) -> &'static [UnconvertibleEntry] {
        CATALOG
    }
}

fn emit_assertion(assertion: &Assertion) -> NodeEmission {
    let locator = |matcher: &str, args: &[String]| {
        let polarity = if assertion.negated { ".not" } else { "" };
        format!(
            "await expect(page.locator({})){polarity}.{matcher}({});",
            quote(&assertion.subject),
            args.join(", ")
        )
    };
    match assertion.matcher.as_str() {
        id if id == matchers::VISIBLE => NodeEmission::mapped(locator("toBeVisible", &[])),
        id if id == matchers::CONTAIN_TEXT => {
            NodeEmission::mapped(locator("toContainText", &assertion.args))
        }
        id if id == matchers::HAVE_VALUE => {
            NodeEmission::mapped(locator("toHaveValue", &assertion.args))
        }
        id if id == matchers::CHECKED => NodeEmission::mapped(locator("toBeChecked", &[])),
        id if id == matchers::EXIST => NodeEmission::warned(
            locator("toHaveCount", &["1".to_string()]),
            "existence is asserted via element count in Playwright",
        ),
        _ => match matchers::emit_jest_assertion(assertion) {
            Some(code) => NodeEmission::mapped(code),
            None => NodeEmission::NotSupported,
        },
    }
}

fn emit_navigation(nav: &Navigation) -> NodeEmission {
    let target = || quote(nav.target.as_deref().unwrap_or_default());
    let args = nav.args.join(", ");
    match &nav.action {
        NavigationAction::Visit => NodeEmission::mapped(format!("await page.goto({args});")),
        NavigationAction::Click => {
            NodeEmission::mapped(format!("await page.click({});", target()))
        }
        NavigationAction::Type => NodeEmission::warned(
            format!("await page.fill({}, {args});", target()),
            "page.fill replaces the field contents; cy.type appended to them",
        ),
        NavigationAction::Wait => NodeEmission::warned(
            format!("await page.waitForTimeout({args});"),
            "fixed timeouts are discouraged in Playwright; prefer event-based waiting",
        ),
        NavigationAction::Select => {
            NodeEmission::mapped(format!("await page.selectOption({}, {args});", target()))
        }
        NavigationAction::Check => NodeEmission::mapped(format!("await page.check({});", target())),
        NavigationAction::Uncheck => {
            NodeEmission::mapped(format!("await page.uncheck({});", target()))
        }
        NavigationAction::Hover => NodeEmission::mapped(format!("await page.hover({});", target())),
        NavigationAction::Press => {
            NodeEmission::mapped(format!("await page.press({}, {args});", target()))
        }
        NavigationAction::Screenshot => {
            NodeEmission::mapped(format!("await page.screenshot({args});"))
        }
        NavigationAction::Custom(_) => NodeEmission::NotSupported,
    }
}
