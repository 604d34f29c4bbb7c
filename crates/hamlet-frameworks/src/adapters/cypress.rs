//! Cypress adapter.
//!
//! Cypress files are Mocha-structured (`describe`/`it`) with the `cy`
//! command chain for browser actions and `.should(...)` assertions.

use hamlet_ir::{
    Assertion, AsyncQualifier, HookKind, Navigation, NavigationAction, Node, Span, TestFile,
};

use super::{emit_case_opener, emit_hook_opener, emit_import, emit_suite_opener};
use crate::parser::{parse_source, SyntaxProfile};
use crate::scan::{matching_paren, quote, split_args, unquote};
use crate::{
    matchers, FrameworkAdapter, FrameworkKind, NodeEmission, ParseError, UnconvertibleEntry,
};

pub struct CypressAdapter;

const HOOKS: &[(&str, HookKind)] = &[
    ("beforeEach", HookKind::BeforeEach),
    ("afterEach", HookKind::AfterEach),
    ("before", HookKind::BeforeAll),
    ("after", HookKind::AfterAll),
];

/// Map a `.should('...')` matcher string to the neutral vocabulary,
/// returning the id and whether the `not.` prefix negates it.
fn should_matcher(raw: &str) -> Option<(&'static str, bool)> {
    let (negated, rest) = match raw.strip_prefix("not.") {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let id = match rest {
        "be.visible" => matchers::VISIBLE,
        "contain" => matchers::CONTAIN_TEXT,
        "have.value" => matchers::HAVE_VALUE,
        "be.checked" => matchers::CHECKED,
        "exist" => matchers::EXIST,
        _ => return None,
    };
    Some((id, negated))
}

fn parse_statement(trimmed: &str, span: Span) -> Option<Node> {
    if let Some(node) = parse_cy_chain(trimmed, span) {
        return Some(node);
    }
    // Cypress bundles Chai; plain value assertions appear in cy files too.
    matchers::parse_chai_assertion(trimmed, span)
}

fn parse_cy_chain(trimmed: &str, span: Span) -> Option<Node> {
    let rest = trimmed.strip_prefix("cy.")?;
    let paren = rest.find('(')?;
    let method = &rest[..paren];
    let close = matching_paren(rest, paren)?;
    let args = split_args(&rest[paren + 1..close]);
    let chain = rest[close + 1..].trim_end_matches(';').trim_end();

    let nav = |action: NavigationAction, target: Option<String>, args: Vec<String>| {
        Some(Node::Navigation(Navigation {
            action,
            target,
            args,
            span,
        }))
    };

    match method {
        "visit" if chain.is_empty() => nav(NavigationAction::Visit, None, args),
        "screenshot" if chain.is_empty() => nav(NavigationAction::Screenshot, None, args),
        "wait" if chain.is_empty() => {
            // Alias waits (`cy.wait('@users')`) belong to the intercept
            // feature; leave them raw for the catalog to flag.
            if args.first().is_some_and(|a| a.contains('@')) {
                return None;
            }
            nav(NavigationAction::Wait, None, args)
        }
        "get" => {
            let selector = unquote(args.first()?);
            let call = chain.strip_prefix('.')?;
            let paren = call.find('(')?;
            let close = matching_paren(call, paren)?;
            if !call[close + 1..].is_empty() {
                return None; // longer chains stay raw
            }
            let call_args = split_args(&call[paren + 1..close]);
            match &call[..paren] {
                "click" => nav(NavigationAction::Click, Some(selector), vec![]),
                "type" => nav(NavigationAction::Type, Some(selector), call_args),
                "select" => nav(NavigationAction::Select, Some(selector), call_args),
                "check" => nav(NavigationAction::Check, Some(selector), vec![]),
                "uncheck" => nav(NavigationAction::Uncheck, Some(selector), vec![]),
                "should" => {
                    let (id, negated) = should_matcher(&unquote(call_args.first()?))?;
                    Some(Node::Assertion(Assertion {
                        subject: selector,
                        matcher: id.to_string(),
                        args: call_args[1..].to_vec(),
                        negated,
                        async_qualifier: AsyncQualifier::None,
                        span,
                    }))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

const PROFILE: SyntaxProfile = SyntaxProfile {
    suite_keywords: &["describe", "context"],
    case_keywords: &["it", "specify"],
    hooks: HOOKS,
    parse_statement,
};

fn is_playwright_route(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("page.route"))
}

fn is_playwright_evaluate(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("page.evaluate"))
}

fn is_playwright_api(node: &Node) -> bool {
    matches!(node, Node::Raw(raw) if raw.text.contains("page."))
}

const CATALOG: &[UnconvertibleEntry] = &[
    UnconvertibleEntry {
        id: "PW-ROUTE",
        message: "page.route interception maps poorly onto cy.intercept",
        manual_action: "rewrite the route handler with cy.intercept",
        detector: is_playwright_route,
    },
    UnconvertibleEntry {
        id: "PW-EVALUATE",
        message: "page.evaluate has no direct Cypress command",
        manual_action: "use cy.window().then() and invoke the code there",
        detector: is_playwright_evaluate,
    },
    UnconvertibleEntry {
        id: "PW-API",
        message: "Playwright page API call without a Cypress command equivalent",
        manual_action: "rewrite using cy.* commands",
        detector: is_playwright_api,
    },
];

impl FrameworkAdapter for CypressAdapter {
    fn name(&self) -> &'static str {
        "cypress"
    }

    fn kind(&self) -> FrameworkKind {
        FrameworkKind::Browser
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".cy.js", ".cy.ts"]
    }

    fn detect(&self, source: &str) -> u8 {
        let mut score = 0u32;
        if source.contains("cy.") {
            score += 70;
        }
        if source.contains("describe(") || source.contains("it(") {
            score += 15;
        }
        if source.contains(".should(") {
            score += 15;
        }
        score.min(100) as u8
    }

    fn parse(&self, source: &str) -> Result<TestFile, ParseError> {
        parse_source(source, &PROFILE)
    }

    fn emit_node(&self, node: &Node) -> NodeEmission {
        match node {
            Node::Import(import) => NodeEmission::mapped(emit_import(import, &[], str::to_string)),
            Node::Suite(suite) => NodeEmission::mapped(emit_suite_opener(suite, "describe")),
            Node::Case(case) => {
                // Cypress commands queue; the callback itself is synchronous.
                let mut case = case.clone();
                case.is_async = false;
                NodeEmission::mapped(emit_case_opener(&case, "it", "()", false))
            }
            Node::Hook(hook) => NodeEmission::mapped(emit_hook_opener(
                hook,
                &["beforeEach", "afterEach", "before", "after"],
                "()",
                false,
            )),
            Node::Assertion(assertion) => emit_assertion(assertion),
            Node::Navigation(nav) => emit_navigation(nav),
            Node::Raw(raw) => {
                if raw.text.contains("page.") {
                    NodeEmission::NotSupported
                } else {
                    NodeEmission::mapped(raw.text.clone())
                }
            }
            Node::Comment(comment) => NodeEmission::mapped(format!("// {}", comment.text)),
        }
    }

    fn unconvertible_catalog(&self) -> &'static [UnconvertibleEntry] {
        CATALOG
    }
}

fn emit_assertion(assertion: &Assertion) -> NodeEmission {
    let should = |spec: String| {
        let polarity = if assertion.negated { "not." } else { "" };
        let mut call_args = vec![format!("'{polarity}{spec}'")];
        call_args.extend(assertion.args.iter().cloned());
        NodeEmission::mapped(format!(
            "cy.get({}).should({});",
            quote(&assertion.subject),
            call_args.join(", ")
        ))
    };
    match assertion.matcher.as_str() {
        id if id == matchers::VISIBLE => should("be.visible".to_string()),
        id if id == matchers::CONTAIN_TEXT => should("contain".to_string()),
        id if id == matchers::HAVE_VALUE => should("have.value".to_string()),
        id if id == matchers::CHECKED => should("be.checked".to_string()),
        id if id == matchers::EXIST => should("exist".to_string()),
        _ => match matchers::emit_chai_assertion(assertion) {
            Some((code, None)) => NodeEmission::mapped(code),
            Some((code, Some(advisory))) => NodeEmission::warned(code, advisory),
            None => NodeEmission::NotSupported,
        },
    }
}

fn emit_navigation(nav: &Navigation) -> NodeEmission {
    let target = || quote(nav.target.as_deref().unwrap_or_default());
    let args = nav.args.join(", ");
    match &nav.action {
        NavigationAction::Visit => NodeEmission::mapped(format!("cy.visit({args});")),
        NavigationAction::Click => {
            NodeEmission::mapped(format!("cy.get({}).click();", target()))
        }
        NavigationAction::Type => {
            NodeEmission::mapped(format!("cy.get({}).type({args});", target()))
        }
        NavigationAction::Wait => NodeEmission::mapped(format!("cy.wait({args});")),
        NavigationAction::Select => {
            NodeEmission::mapped(format!("cy.get({}).select({args});", target()))
        }
        NavigationAction::Check => NodeEmission::mapped(format!("cy.get({}).check();", target())),
        NavigationAction::Uncheck => {
            NodeEmission::mapped(format!("cy.get({}).uncheck();", target()))
        }
        NavigationAction::Hover => NodeEmission::warned(
            format!("cy.get({}).trigger('mouseover');", target()),
            "Cypress has no native hover; a synthetic mouseover event is fired instead",
        ),
        NavigationAction::Press => NodeEmission::warned(
            format!("cy.get({}).type({args});", target()),
            "key presses are typed as text in Cypress; verify the key token",
        ),
        NavigationAction::Screenshot => NodeEmission::mapped(format!("cy.screenshot({args});")),
        NavigationAction::Custom(_) => NodeEmission::NotSupported,
    }
}
