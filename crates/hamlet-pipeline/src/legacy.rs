//! Legacy whole-text pattern rewriting.
//!
//! The correctness floor of the fallback chain: a direct text-to-text
//! substitution table per conversion direction, used when no IR-backed
//! route produced output and as the line processor during parse-error
//! recovery. It knows nothing about structure; it must therefore be
//! conservative — a pattern either rewrites a line safely or the line is
//! left alone, and lines touching known-impossible features are flagged
//! instead of mangled.

use hamlet_common::annotations;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::recovery::RecoveryError;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Substring markers that make a line untranslatable at text level, with
/// the reason reported to the caller.
type Blocklist = &'static [(&'static str, &'static str)];

struct DirectionTable {
    rules: Vec<Rule>,
    blocklist: Blocklist,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    // Table patterns are literals written in this module; a bad one is a
    // programming error caught by the table tests.
    match Regex::new(pattern) {
        Ok(re) => Rule {
            pattern: re,
            replacement,
        },
        Err(err) => unreachable!("invalid legacy rewrite pattern {pattern:?}: {err}"),
    }
}

static TABLES: Lazy<FxHashMap<(&'static str, &'static str), DirectionTable>> = Lazy::new(|| {
    let mut tables = FxHashMap::default();

    tables.insert(
        ("jest", "vitest"),
        DirectionTable {
            rules: vec![
                rule(r#"from ['"]@jest/globals['"]"#, "from 'vitest'"),
                rule(r"\bjest\.", "vi."),
            ],
            blocklist: &[(
                "(done)",
                "the done completion callback is not supported in Vitest",
            )],
        },
    );
    tables.insert(
        ("vitest", "jest"),
        DirectionTable {
            rules: vec![
                rule(r#"from ['"]vitest['"]"#, "from '@jest/globals'"),
                rule(r"\bvi\.", "jest."),
            ],
            blocklist: &[],
        },
    );
    tables.insert(
        ("mocha", "jest"),
        DirectionTable {
            rules: vec![
                rule(r"\.to\.deep\.equal\(", ".toEqual("),
                rule(r"\.to\.equal\(", ".toBe("),
                rule(r"\.to\.include\(", ".toContain("),
                rule(r"\.to\.have\.lengthOf\(", ".toHaveLength("),
                rule(r"\.to\.match\(", ".toMatch("),
                rule(r"\bbefore\(", "beforeAll("),
                rule(r"\bafter\(", "afterAll("),
                rule(r#"(?:const|let|var)\s*\{[^}]*\}\s*=\s*require\(['"]chai['"]\);?"#, ""),
            ],
            blocklist: &[],
        },
    );
    tables.insert(
        ("mocha", "vitest"),
        DirectionTable {
            rules: vec![
                rule(r"\.to\.deep\.equal\(", ".toEqual("),
                rule(r"\.to\.equal\(", ".toBe("),
                rule(r"\.to\.include\(", ".toContain("),
                rule(r"\.to\.have\.lengthOf\(", ".toHaveLength("),
                rule(r"\.to\.match\(", ".toMatch("),
                rule(r"\bbefore\(", "beforeAll("),
                rule(r"\bafter\(", "afterAll("),
                rule(
                    r#"(?:const|let|var)\s*\{[^}]*\}\s*=\s*require\(['"]chai['"]\);?"#,
                    "import { describe, it, expect } from 'vitest';",
                ),
            ],
            blocklist: &[],
        },
    );
    tables.insert(
        ("jest", "mocha"),
        DirectionTable {
            rules: vec![
                rule(r"\.toEqual\(", ".to.deep.equal("),
                rule(r"\.toBe\(", ".to.equal("),
                rule(r"\.toContain\(", ".to.include("),
                rule(r"\.toHaveLength\(", ".to.have.lengthOf("),
                rule(r"\.toMatch\(", ".to.match("),
                rule(r"\bbeforeAll\(", "before("),
                rule(r"\bafterAll\(", "after("),
            ],
            blocklist: &[
                ("jest.mock(", "module mocking has no Mocha equivalent"),
                ("jest.fn(", "mock functions require sinon under Mocha"),
                ("toMatchSnapshot", "Chai has no snapshot matcher"),
            ],
        },
    );
    tables.insert(
        ("vitest", "mocha"),
        DirectionTable {
            rules: vec![
                rule(r"\.toEqual\(", ".to.deep.equal("),
                rule(r"\.toBe\(", ".to.equal("),
                rule(r"\.toContain\(", ".to.include("),
                rule(r"\.toHaveLength\(", ".to.have.lengthOf("),
                rule(r"\.toMatch\(", ".to.match("),
                rule(r"\bbeforeAll\(", "before("),
                rule(r"\bafterAll\(", "after("),
                rule(
                    r#"import\s*\{[^}]*\}\s*from\s*['"]vitest['"];?"#,
                    "const { expect } = require('chai');",
                ),
            ],
            blocklist: &[
                ("vi.mock(", "module mocking has no Mocha equivalent"),
                ("vi.fn(", "mock functions require sinon under Mocha"),
                ("toMatchSnapshot", "Chai has no snapshot matcher"),
            ],
        },
    );
    tables.insert(
        ("cypress", "playwright"),
        DirectionTable {
            rules: vec![
                rule(r"cy\.visit\(", "await page.goto("),
                rule(r"cy\.get\(([^)]+)\)\.click\(\)", "await page.click($1)"),
                rule(r"cy\.get\(([^)]+)\)\.type\(([^)]+)\)", "await page.fill($1, $2)"),
                rule(r"cy\.get\(([^)]+)\)\.check\(\)", "await page.check($1)"),
                rule(r"cy\.wait\((\d+)\)", "await page.waitForTimeout($1)"),
                rule(r"cy\.screenshot\(", "await page.screenshot("),
            ],
            blocklist: &[
                ("cy.intercept", "network interception must be rewritten with page.route"),
                ("cy.fixture", "fixture loading has no Playwright equivalent"),
                ("cy.wait('@", "alias waits must become page.waitForResponse"),
            ],
        },
    );
    tables.insert(
        ("playwright", "cypress"),
        DirectionTable {
            rules: vec![
                rule(r"await page\.goto\(", "cy.visit("),
                rule(r"await page\.click\(([^)]+)\)", "cy.get($1).click()"),
                rule(r"await page\.fill\(([^,]+),\s*([^)]+)\)", "cy.get($1).type($2)"),
                rule(r"await page\.waitForTimeout\((\d+)\)", "cy.wait($1)"),
                rule(r"await page\.screenshot\(", "cy.screenshot("),
            ],
            blocklist: &[
                ("page.route", "route handlers must be rewritten with cy.intercept"),
                ("page.evaluate", "page.evaluate has no direct Cypress command"),
            ],
        },
    );

    tables
});

fn table_for(from: &str, to: &str) -> Option<&'static DirectionTable> {
    // Keyed by &'static str pairs, so a `get` with borrowed names would
    // demand 'static from the caller; a scan over eight entries is fine.
    TABLES
        .iter()
        .find(|((f, t), _)| *f == from && *t == to)
        .map(|(_, table)| table)
}

/// Rewrite one line, or report why it cannot be converted at text level.
/// Directions without a table pass text through unchanged.
pub fn rewrite_line(from: &str, to: &str, line: &str) -> Result<String, RecoveryError> {
    let Some(table) = table_for(from, to) else {
        return Ok(line.to_string());
    };
    for (marker, reason) in table.blocklist {
        if line.contains(marker) {
            return Err(RecoveryError::new(*reason));
        }
    }
    let mut out = line.to_string();
    for rule in &table.rules {
        if rule.pattern.is_match(&out) {
            out = rule.pattern.replace_all(&out, rule.replacement).into_owned();
        }
    }
    Ok(out)
}

/// Result of a whole-text rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyResult {
    pub code: String,
    /// Lines considered, excluding empty lines.
    pub total_lines: usize,
    /// Lines changed by a substitution.
    pub rewritten: usize,
    /// Lines flagged via the blocklist and annotated instead of rewritten.
    pub flagged: usize,
}

/// Rewrite a whole document line by line. Blocklisted lines are preserved
/// verbatim under an advisory annotation.
pub fn rewrite(from: &str, to: &str, text: &str) -> LegacyResult {
    let mut out: Vec<String> = Vec::new();
    let mut total_lines = 0usize;
    let mut rewritten = 0usize;
    let mut flagged = 0usize;

    for line in text.split('\n') {
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        total_lines += 1;
        match rewrite_line(from, to, line) {
            Ok(converted) => {
                if converted != line {
                    rewritten += 1;
                }
                out.push(converted);
            }
            Err(err) => {
                flagged += 1;
                out.push(annotations::advisory(&err.message, line.trim_start()));
                out.push(line.to_string());
            }
        }
    }

    LegacyResult {
        code: out.join("\n"),
        total_lines,
        rewritten,
        flagged,
    }
}
