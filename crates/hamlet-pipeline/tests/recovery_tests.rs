//! Behavioral contracts of `wrap` and `recover_from_parse_error`.

use hamlet_pipeline::recovery::{recover_from_parse_error, wrap, RecoveryError};

fn parse_failure() -> RecoveryError {
    RecoveryError::new("unexpected end of input")
}

#[test]
fn test_wrap_passes_through_success() {
    let outcome = wrap(|| Ok::<_, RecoveryError>(5 * 2), None);
    assert_eq!(outcome.result, Some(10));
    assert!(outcome.error.is_none());
    assert!(outcome.is_ok());
}

#[test]
fn test_wrap_substitutes_fallback_on_error() {
    let outcome = wrap(
        || Err::<&str, _>(RecoveryError::new("boom")),
        Some("fallback"),
    );
    assert_eq!(outcome.result, Some("fallback"));
    assert_eq!(outcome.error.as_ref().map(|e| e.message.as_str()), Some("boom"));
}

#[test]
fn test_wrap_contains_panics() {
    let outcome = wrap(|| -> Result<u32, RecoveryError> { panic!("boom") }, None);
    assert_eq!(outcome.result, None);
    assert_eq!(outcome.error.as_ref().map(|e| e.message.as_str()), Some("boom"));
}

#[test]
fn test_all_lines_succeeding_still_notes_recovery() {
    let recovery = recover_from_parse_error("line1\nline2\nline3", &parse_failure(), |line| {
        Ok::<_, RecoveryError>(line.to_uppercase())
    });
    assert!(recovery.recovered.contains("LINE1"));
    assert!(recovery.recovered.contains("LINE2"));
    assert!(recovery.recovered.contains("LINE3"));
    assert!(recovery.recovered.contains("HAMLET-WARNING"));
    assert!(recovery.recovered.contains("recovered from parse error"));
    assert!(!recovery.warnings.is_empty());
}

#[test]
fn test_failing_line_is_preserved_under_annotation() {
    let recovery = recover_from_parse_error("good\nbad\ngood2", &parse_failure(), |line| {
        if line == "bad" {
            Err(RecoveryError::new("cannot process"))
        } else {
            Ok(line.to_uppercase())
        }
    });
    assert!(recovery.recovered.contains("HAMLET-WARNING"));
    assert!(recovery.recovered.contains("bad"));
    assert!(recovery.recovered.contains("GOOD"));
    assert!(recovery.recovered.contains("GOOD2"));
    assert!(!recovery.warnings.is_empty());
}

#[test]
fn test_line_count_never_shrinks() {
    let content = "a\n\nb\nc";
    let recovery = recover_from_parse_error(content, &parse_failure(), |line| {
        if line == "b" {
            Err(RecoveryError::new("nope"))
        } else {
            Ok(line.to_string())
        }
    });
    let original_lines = content.split('\n').count();
    let recovered_lines = recovery.recovered.split('\n').count();
    assert!(recovered_lines >= original_lines);
}

#[test]
fn test_empty_lines_stay_empty() {
    let recovery = recover_from_parse_error("a\n\n\nb", &parse_failure(), |line| {
        Ok::<_, RecoveryError>(format!("{line}!"))
    });
    let lines: Vec<&str> = recovery.recovered.split('\n').collect();
    let empties = lines.iter().filter(|l| l.is_empty()).count();
    assert_eq!(empties, 2);
}

#[test]
fn test_panicking_processor_is_treated_as_line_failure() {
    let recovery = recover_from_parse_error("ok\nkaboom", &parse_failure(), |line| {
        if line == "kaboom" {
            panic!("processor bug");
        }
        Ok::<_, RecoveryError>(line.to_string())
    });
    assert!(recovery.recovered.contains("kaboom"));
    assert!(recovery.recovered.contains("HAMLET-WARNING"));
    assert!(recovery.warnings.iter().any(|w| w.contains("processor bug")));
}
