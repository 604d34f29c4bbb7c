//! Built-in framework adapter catalog.
//!
//! Unit frameworks: Jest, Vitest, Mocha (+Chai). Browser frameworks:
//! Cypress, Playwright. Adapters are intentionally line-level translators:
//! anything they cannot model degrades to `RawCode` at parse time and to an
//! annotation at emit time; the pipeline's fallback stages take it from
//! there.

mod cypress;
mod jest;
mod mocha;
mod playwright;
mod vitest;

pub use cypress::CypressAdapter;
pub use jest::JestAdapter;
pub use mocha::MochaAdapter;
pub use playwright::PlaywrightAdapter;
pub use vitest::VitestAdapter;

use std::sync::Arc;

use hamlet_ir::{Hook, HookKind, ImportStatement, Modifier, TestCase, TestSuite};

use crate::FrameworkAdapter;

/// The shipped adapter catalog, in registration order.
pub fn builtins() -> Vec<Arc<dyn FrameworkAdapter>> {
    vec![
        Arc::new(JestAdapter),
        Arc::new(VitestAdapter),
        Arc::new(MochaAdapter),
        Arc::new(CypressAdapter),
        Arc::new(PlaywrightAdapter),
    ]
}

/// Emit a suite opener in `keyword('name', () => {` style.
pub(crate) fn emit_suite_opener(suite: &TestSuite, keyword: &str) -> String {
    let callee = match suite.modifier {
        Modifier::None => keyword.to_string(),
        Modifier::Skip => format!("{keyword}.skip"),
        Modifier::Only => format!("{keyword}.only"),
    };
    format!("{callee}({}, () => {{", crate::scan::quote(&suite.name))
}

/// Emit a case opener. `params` is the callback parameter list (e.g. `()`
/// or `({ page })`); `force_async` emits `async` regardless of the source
/// case.
pub(crate) fn emit_case_opener(
    case: &TestCase,
    keyword: &str,
    params: &str,
    force_async: bool,
) -> String {
    let callee = match case.modifier {
        Modifier::None => keyword.to_string(),
        Modifier::Skip => format!("{keyword}.skip"),
        Modifier::Only => format!("{keyword}.only"),
    };
    let params = if case.uses_done_callback && !force_async {
        "(done)"
    } else {
        params
    };
    let async_kw = if case.is_async || force_async {
        "async "
    } else {
        ""
    };
    format!(
        "{callee}({}, {async_kw}{params} => {{",
        crate::scan::quote(&case.name)
    )
}

/// Emit a hook opener using this framework's four hook names, indexed by
/// kind. `params` as in [`emit_case_opener`].
pub(crate) fn emit_hook_opener(
    hook: &Hook,
    names: &[&str; 4],
    params: &str,
    force_async: bool,
) -> String {
    let name = match hook.kind {
        HookKind::BeforeEach => names[0],
        HookKind::AfterEach => names[1],
        HookKind::BeforeAll => names[2],
        HookKind::AfterAll => names[3],
    };
    let async_kw = if force_async { "async " } else { "" };
    format!("{name}({async_kw}{params} => {{")
}

/// Emit an import statement, mapping module specifiers through
/// `source_map` (pairs of original → replacement) and specifier names
/// through `spec_map`.
pub(crate) fn emit_import(
    import: &ImportStatement,
    source_map: &[(&str, &str)],
    spec_map: fn(&str) -> String,
) -> String {
    let source = source_map
        .iter()
        .find(|(from, _)| *from == import.source)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| import.source.clone());
    if import.side_effect_only || import.specifiers.is_empty() {
        return format!("import {};", crate::scan::quote(&source));
    }
    let specs: Vec<String> = import.specifiers.iter().map(|s| spec_map(s)).collect();
    format!(
        "import {{ {} }} from {};",
        specs.join(", "),
        crate::scan::quote(&source)
    )
}

/// Rewrite occurrences of one framework API prefix (`jest.`, `vi.`, …) with
/// another, requiring a non-identifier character (or line start) before the
/// match so `navi.` is never touched.
pub(crate) fn rewrite_api(text: &str, from: &str, to: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;
    while let Some(pos) = rest.find(from) {
        let boundary_ok = pos == 0
            || rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| !c.is_alphanumeric() && c != '_' && c != '.');
        out.push_str(&rest[..pos]);
        if boundary_ok {
            out.push_str(to);
            changed = true;
        } else {
            out.push_str(from);
        }
        rest = &rest[pos + from.len()..];
    }
    out.push_str(rest);
    changed.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_common::span::Span;

    #[test]
    fn test_rewrite_api_respects_boundaries() {
        assert_eq!(
            rewrite_api("jest.fn(); myjest.fn();", "jest.", "vi.").unwrap(),
            "vi.fn(); myjest.fn();"
        );
        assert!(rewrite_api("navi.go();", "vi.", "jest.").is_none());
        assert_eq!(
            rewrite_api("const m = vi.fn();", "vi.", "jest.").unwrap(),
            "const m = jest.fn();"
        );
    }

    #[test]
    fn test_emit_case_opener_variants() {
        let case = TestCase {
            name: "adds".to_string(),
            body: vec![],
            modifier: Modifier::Only,
            is_async: true,
            uses_done_callback: false,
            span: Span::empty(),
        };
        assert_eq!(
            emit_case_opener(&case, "it", "()", false),
            "it.only('adds', async () => {"
        );
        assert_eq!(
            emit_case_opener(&case, "test", "({ page })", true),
            "test.only('adds', async ({ page }) => {"
        );
    }
}
