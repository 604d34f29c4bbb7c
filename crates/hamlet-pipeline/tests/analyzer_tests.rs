//! Analysis report contracts over in-memory directory snapshots.

use hamlet_frameworks::registry::FrameworkRegistry;
use hamlet_pipeline::{analyze, AnalyzerEntry};

fn entries() -> Vec<AnalyzerEntry> {
    vec![
        AnalyzerEntry::new(
            "tests/unit/cart.test.js",
            "import { test, expect } from '@jest/globals';\n\ntest('adds', () => {\n  expect(1).toBe(1);\n});\n",
        ),
        AnalyzerEntry::new(
            "e2e/login.cy.js",
            "describe('login', () => {\n  it('works', () => {\n    cy.visit('/login');\n    cy.get('#go').click();\n  });\n});\n",
        ),
        AnalyzerEntry::new("src/cart.js", "export function add(a, b) {\n  return a + b;\n}\n"),
    ]
}

#[test]
fn test_summary_counts_test_files_only() {
    let registry = FrameworkRegistry::with_builtins();
    let report = analyze(&registry, ".", "0.1.0", &entries());
    assert_eq!(report.summary.file_count, 3);
    assert_eq!(report.summary.test_file_count, 2);
    assert!(report.summary.confidence_avg > 0.0);
}

#[test]
fn test_detected_frameworks_cover_both_kinds() {
    let registry = FrameworkRegistry::with_builtins();
    let report = analyze(&registry, ".", "0.1.0", &entries());
    assert!(report.summary.frameworks_detected.contains(&"jest".to_string()));
    assert!(report.summary.frameworks_detected.contains(&"cypress".to_string()));
}

#[test]
fn test_files_are_sorted_by_path() {
    let registry = FrameworkRegistry::with_builtins();
    let report = analyze(&registry, ".", "0.1.0", &entries());
    let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

#[test]
fn test_report_serializes_with_contract_keys() {
    let registry = FrameworkRegistry::with_builtins();
    let report = analyze(&registry, "/repo", "0.1.0", &entries());
    let value = serde_json::to_value(&report).expect("serializes");
    assert!(value.get("schemaVersion").is_some());
    assert_eq!(value["meta"]["root"], "/repo");
    assert!(value["summary"].get("testFileCount").is_some());
    assert!(value["summary"].get("confidenceAvg").is_some());
    let unknown = value["files"]
        .as_array()
        .expect("files array")
        .iter()
        .find(|f| f["path"] == "src/cart.js")
        .expect("non-test file present");
    assert_eq!(unknown["type"], "unknown");
}
