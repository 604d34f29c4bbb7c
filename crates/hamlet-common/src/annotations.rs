//! Stable inline annotation formats.
//!
//! Annotations are emitted into generated code and parsed by downstream
//! tooling, so the byte format is a wire contract:
//!
//! - Advisory: `// HAMLET-WARNING: <message>` followed by
//!   `// Original: <original line>`. The converted code still runs; the
//!   original is shown for review.
//! - Blocking: `// HAMLET-TODO [<CATALOG-ID>]: <message>` followed by the
//!   original construct, the required manual action, and the original
//!   construct re-emitted commented out.
//!
//! All producers (adapters, pipeline stages, error recovery) go through this
//! module so the format cannot drift between them.

/// Marker for advisory annotations.
pub const WARNING_TAG: &str = "HAMLET-WARNING";

/// Marker for blocking annotations.
pub const TODO_TAG: &str = "HAMLET-TODO";

/// Format an advisory annotation block.
pub fn advisory(message: &str, original: &str) -> String {
    format!("// {WARNING_TAG}: {message}\n// Original: {original}")
}

/// Format a file-level advisory with no associated construct.
pub fn file_advisory(message: &str) -> String {
    format!("// {WARNING_TAG}: {message}")
}

/// Format a blocking annotation block. The original construct is preserved
/// twice: once in the `Original:` reference line and once commented out so
/// the file still parses in the target framework.
pub fn blocking(id: &str, message: &str, original: &str, manual_action: &str) -> String {
    format!(
        "// {TODO_TAG} [{id}]: {message}\n// Original: {original}\n// Manual action required: {manual_action}\n// {original}"
    )
}

/// Comment out a single line of code.
pub fn comment_out(line: &str) -> String {
    format!("// {line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_format() {
        let a = advisory("behavior differs", "cy.wait(500);");
        assert_eq!(
            a,
            "// HAMLET-WARNING: behavior differs\n// Original: cy.wait(500);"
        );
    }

    #[test]
    fn test_blocking_format() {
        let b = blocking(
            "CY-INTERCEPT",
            "no direct equivalent",
            "cy.intercept('GET', '/api');",
            "use page.route()",
        );
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("// HAMLET-TODO [CY-INTERCEPT]: "));
        assert!(lines[1].starts_with("// Original: "));
        assert!(lines[2].starts_with("// Manual action required: "));
        assert_eq!(lines[3], "// cy.intercept('GET', '/api');");
    }

    #[test]
    fn test_file_advisory_single_line() {
        let a = file_advisory("recovered from parse error");
        assert!(!a.contains('\n'));
        assert!(a.contains(WARNING_TAG));
    }
}
