//! Error recovery facilities.
//!
//! Two independent tools keep content-level failures from ever crossing the
//! pipeline boundary as errors:
//!
//! - [`wrap`] adapts a fallible call (an `Err` return or a panic) into a
//!   non-panicking result/error pair. Adapter calls inside the pipeline all
//!   go through it, so a buggy adapter degrades a stage instead of
//!   unwinding through the conversion chain.
//! - [`recover_from_parse_error`] salvages a document that failed to parse
//!   as a whole by re-processing it line by line, preserving failed lines
//!   verbatim under an advisory annotation.

use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};

use hamlet_common::annotations;
use thiserror::Error;

/// A captured failure: the message of an `Err` or the payload of a panic.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RecoveryError {
    pub message: String,
}

impl RecoveryError {
    pub fn new(message: impl Into<String>) -> Self {
        RecoveryError {
            message: message.into(),
        }
    }

    fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());
        RecoveryError { message }
    }
}

/// The non-throwing shape of a wrapped call: exactly one of `result` and
/// `error` is populated, except when a fallback value stands in for a
/// failed result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapOutcome<T> {
    pub result: Option<T>,
    pub error: Option<RecoveryError>,
}

impl<T> WrapOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `f`, converting an `Err` return or a panic into a [`WrapOutcome`].
/// On failure the outcome carries `fallback` (or `None`) as its result.
pub fn wrap<T, E: Display>(
    f: impl FnOnce() -> Result<T, E>,
    fallback: Option<T>,
) -> WrapOutcome<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => WrapOutcome {
            result: Some(value),
            error: None,
        },
        Ok(Err(err)) => WrapOutcome {
            result: fallback,
            error: Some(RecoveryError::new(err.to_string())),
        },
        Err(payload) => WrapOutcome {
            result: fallback,
            error: Some(RecoveryError::from_panic(payload)),
        },
    }
}

/// Output of per-line salvage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRecovery {
    pub recovered: String,
    pub warnings: Vec<String>,
}

/// Salvage a document whose whole-document parse failed.
///
/// Each line is processed independently through `processor` (via [`wrap`]):
/// a successful line is replaced by its processed form, a failed line is
/// preserved verbatim under an advisory annotation, and empty lines stay
/// empty. If every line succeeds, a single file-level advisory still marks
/// that recovery occurred, so callers always learn about it.
pub fn recover_from_parse_error<E: Display>(
    content: &str,
    error: &E,
    processor: impl Fn(&str) -> Result<String, RecoveryError>,
) -> LineRecovery {
    tracing::warn!(%error, "whole-document parse failed; recovering per line");
    let mut out: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for (idx, line) in content.split('\n').enumerate() {
        let line_no = idx + 1;
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        let processed = wrap(|| processor(line), None);
        match processed.result {
            Some(converted) => out.push(converted),
            None => {
                let err = processed
                    .error
                    .unwrap_or_else(|| RecoveryError::new("line processor failed"));
                out.push(annotations::advisory(
                    &format!("could not convert line {line_no}: {err}"),
                    line,
                ));
                out.push(line.to_string());
                warnings.push(format!("line {line_no}: {err}"));
            }
        }
    }

    if warnings.is_empty() {
        out.insert(
            0,
            annotations::file_advisory(&format!("recovered from parse error: {error}")),
        );
        warnings.push(format!("recovered from parse error: {error}"));
    }

    LineRecovery {
        recovered: out.join("\n"),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_success() {
        let outcome = wrap(|| Ok::<_, RecoveryError>(5 * 2), None);
        assert_eq!(outcome.result, Some(10));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_wrap_error_with_fallback() {
        let outcome = wrap(
            || Err::<&str, _>(RecoveryError::new("boom")),
            Some("fallback"),
        );
        assert_eq!(outcome.result, Some("fallback"));
        assert_eq!(outcome.error.unwrap().message, "boom");
    }

    #[test]
    fn test_wrap_contains_panic() {
        let outcome: WrapOutcome<i32> = wrap(|| -> Result<i32, RecoveryError> { panic!("kaboom") }, Some(7));
        assert_eq!(outcome.result, Some(7));
        assert_eq!(outcome.error.unwrap().message, "kaboom");
    }
}
