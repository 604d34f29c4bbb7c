//! Filesystem-level driver tests.

use std::fs;
use std::path::PathBuf;

use hamlet_cli::args::{AnalyzeArgs, ConvertArgs};
use hamlet_cli::driver::{run_analyze, run_convert};
use hamlet_frameworks::registry::ConfigError;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dirs");
    }
    fs::write(&path, content).expect("write fixture");
    path
}

fn convert_args(path: PathBuf, from: &str, to: &str) -> ConvertArgs {
    ConvertArgs {
        path,
        from: from.to_string(),
        to: to.to_string(),
        out_dir: None,
        report: None,
        dry_run: false,
    }
}

#[test]
fn test_convert_directory_writes_outputs_and_report() {
    let dir = TempDir::new().expect("tempdir");
    write_fixture(
        &dir,
        "tests/cart.test.js",
        "test('adds', () => {\n  expect(1 + 1).toBe(2);\n});\n",
    );
    write_fixture(&dir, "src/cart.js", "export const add = (a, b) => a + b;\n");

    let out_dir = dir.path().join("converted");
    let report_path = dir.path().join("report.json");
    let mut args = convert_args(dir.path().to_path_buf(), "jest", "vitest");
    args.out_dir = Some(out_dir.clone());
    args.report = Some(report_path.clone());

    let report = run_convert(&args).expect("conversion runs");
    assert_eq!(report.results.files_converted, 1);
    assert_eq!(report.results.files_skipped, 1);
    assert_eq!(report.results.files_failed, 0);

    let converted = fs::read_to_string(out_dir.join("tests/cart.test.js"))
        .expect("converted file written");
    assert!(converted.contains("from 'vitest'"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report written"))
            .expect("report parses");
    assert_eq!(json["plan"]["direction"]["from"], "jest");
    assert_eq!(json["results"]["filesConverted"], 1);
}

#[test]
fn test_dot_named_root_is_not_pruned() {
    // The hidden-name filter applies to entries under the root, never to
    // the root itself; converting `.` or an explicit dot-directory works.
    let dir = TempDir::new().expect("tempdir");
    write_fixture(
        &dir,
        ".suites/cart.test.js",
        "test('adds', () => {\n  expect(1 + 1).toBe(2);\n});\n",
    );

    let mut args = convert_args(dir.path().join(".suites"), "jest", "vitest");
    args.dry_run = true;
    let report = run_convert(&args).expect("conversion runs");
    assert_eq!(report.results.files_converted, 1);

    // Hidden directories below the root still get skipped.
    let mut nested = convert_args(dir.path().to_path_buf(), "jest", "vitest");
    nested.dry_run = true;
    let report = run_convert(&nested).expect("conversion runs");
    assert_eq!(report.results.files_converted, 0);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(
        &dir,
        "math.test.js",
        "test('adds', () => {\n  expect(2).toBe(2);\n});\n",
    );
    let before = fs::read_to_string(&input).expect("read input");

    let mut args = convert_args(input.clone(), "jest", "vitest");
    args.dry_run = true;
    let report = run_convert(&args).expect("conversion runs");

    assert_eq!(report.results.files_converted, 1);
    assert_eq!(fs::read_to_string(&input).expect("input intact"), before);
}

#[test]
fn test_in_place_conversion_overwrites_input() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(
        &dir,
        "math.test.js",
        "test('adds', () => {\n  expect(2).toBe(2);\n});\n",
    );

    run_convert(&convert_args(input.clone(), "jest", "vitest")).expect("conversion runs");
    let after = fs::read_to_string(&input).expect("read output");
    assert!(after.contains("from 'vitest'"));
}

#[test]
fn test_unknown_framework_surfaces_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_fixture(&dir, "a.test.js", "test('x', () => {});\n");
    let err = run_convert(&convert_args(input, "jest", "qunit")).unwrap_err();
    assert!(err.downcast_ref::<ConfigError>().is_some());
}

#[test]
fn test_missing_path_is_an_error() {
    let err = run_convert(&convert_args(PathBuf::from("/nonexistent/hamlet"), "jest", "vitest"))
        .unwrap_err();
    assert!(err.downcast_ref::<ConfigError>().is_none());
}

#[test]
fn test_analyze_reports_frameworks() {
    let dir = TempDir::new().expect("tempdir");
    write_fixture(
        &dir,
        "e2e/login.cy.js",
        "describe('login', () => {\n  it('works', () => {\n    cy.visit('/');\n  });\n});\n",
    );
    write_fixture(&dir, "src/util.js", "export const id = (x) => x;\n");

    let report_path = dir.path().join("analysis.json");
    let report = run_analyze(&AnalyzeArgs {
        path: dir.path().to_path_buf(),
        report: Some(report_path.clone()),
    })
    .expect("analysis runs");

    assert_eq!(report.summary.file_count, 2);
    assert_eq!(report.summary.test_file_count, 1);
    assert!(report.summary.frameworks_detected.contains(&"cypress".to_string()));
    assert!(report_path.exists());
}
