//! The three-stage conversion chain.
//!
//! A single file moves through at most four attempts, first success wins:
//!
//! 1. full-IR emission, when the route is pipeline-backed;
//! 2. IR-guided patching of the original text at provenance spans;
//! 3. the legacy pattern rewrite, the always-available floor;
//! 4. line-by-line recovery, when the source never parsed at all.
//!
//! Configuration problems (unknown framework, incompatible kinds) are the
//! only errors a caller sees; everything downstream degrades into a file
//! outcome instead of failing.

use std::sync::Arc;

use hamlet_common::limits::{LEGACY_CONFIDENCE_CEILING, MAX_SOURCE_BYTES};
use hamlet_common::report::{EmitStage, FileStatus};
use hamlet_frameworks::emit::{self, EmitTrace};
use hamlet_frameworks::registry::{ConfigError, FrameworkRegistry, Route};
use hamlet_frameworks::EmitOutcome;
use hamlet_ir::TestFile;

use crate::confidence::{score, Classification};
use crate::recovery::{self, RecoveryError};
use crate::{legacy, patcher};

/// Per-file conversion result: what goes in the report.
#[derive(Clone, Debug)]
pub struct FileOutcome {
    pub status: FileStatus,
    pub stage: Option<EmitStage>,
    pub todos_added: usize,
    pub warnings_added: usize,
    pub confidence: u8,
}

/// Converted code plus its outcome.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub code: String,
    pub outcome: FileOutcome,
}

pub struct ConversionPipeline {
    registry: Arc<FrameworkRegistry>,
}

impl ConversionPipeline {
    pub fn new(registry: Arc<FrameworkRegistry>) -> Self {
        Self { registry }
    }

    pub fn with_builtins() -> Self {
        Self::new(Arc::new(FrameworkRegistry::with_builtins()))
    }

    pub fn registry(&self) -> &FrameworkRegistry {
        &self.registry
    }

    /// Convert one source document between two registered frameworks.
    ///
    /// The only fallible part is route resolution; from there every failure
    /// degrades into a lower stage and ultimately a `Failed` outcome that
    /// carries the original text unchanged.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<Conversion, ConfigError> {
        let route = self.registry.resolve(from, to)?;

        if source.len() > MAX_SOURCE_BYTES {
            tracing::warn!(from, to, bytes = source.len(), "source exceeds size limit");
            return Ok(Conversion {
                code: source.to_string(),
                outcome: FileOutcome {
                    status: FileStatus::Failed,
                    stage: None,
                    todos_added: 0,
                    warnings_added: 0,
                    confidence: 0,
                },
            });
        }

        let parsed = recovery::wrap(|| route.source.parse(source), None);
        match parsed.result {
            Some(file) => Ok(self.convert_parsed(&route, &file, source, from, to)),
            None => {
                let error = parsed
                    .error
                    .unwrap_or_else(|| RecoveryError::new("parse produced no result"));
                Ok(self.recover(&error, source, from, to))
            }
        }
    }

    fn convert_parsed(
        &self,
        route: &Route,
        file: &TestFile,
        source: &str,
        from: &str,
        to: &str,
    ) -> Conversion {
        if route.pipeline_backed {
            let full = recovery::wrap(
                || -> Result<Option<(String, EmitTrace)>, RecoveryError> {
                    match route.target.emit_full_file(file, source) {
                        EmitOutcome::Emitted(code) => {
                            let mut trace = EmitTrace::default();
                            // Re-walk for the classification; emit_full_file
                            // reports only the text.
                            let _ = emit::assemble(route.target.as_ref(), file, source, &mut trace);
                            Ok(Some((code, trace)))
                        }
                        EmitOutcome::NotSupported => Ok(None),
                    }
                },
                None,
            );
            if let Some(error) = &full.error {
                tracing::warn!(from, to, %error, "full-IR emission failed, falling back");
            }
            if let Some(Some((code, trace))) = full.result {
                tracing::debug!(from, to, stage = "full-ir", "emitted");
                return Self::traced_outcome(code, &trace, EmitStage::FullIr, None);
            }
        }

        let patched = recovery::wrap(
            || -> Result<Option<(String, EmitTrace)>, RecoveryError> {
                Ok(patcher::patch_source(route.target.as_ref(), file, source))
            },
            None,
        );
        if let Some(error) = &patched.error {
            tracing::warn!(from, to, %error, "IR patching failed, falling back");
        }
        if let Some(Some((code, trace))) = patched.result {
            tracing::debug!(from, to, stage = "ir-patch", "emitted");
            return Self::traced_outcome(code, &trace, EmitStage::IrPatch, None);
        }

        self.legacy_stage(source, from, to)
    }

    fn legacy_stage(&self, source: &str, from: &str, to: &str) -> Conversion {
        let result = legacy::rewrite(from, to, source);
        tracing::debug!(from, to, stage = "legacy", rewritten = result.rewritten, "emitted");
        let classification = Classification {
            mapped: result.total_lines - result.rewritten - result.flagged,
            warned: result.rewritten,
            unconvertible: result.flagged,
        };
        // Text substitution never inspects structure; its confidence is
        // capped below the IR-backed stages.
        let confidence = score(&classification).min(LEGACY_CONFIDENCE_CEILING);
        Conversion {
            code: result.code,
            outcome: FileOutcome {
                status: FileStatus::Converted,
                stage: Some(EmitStage::Legacy),
                todos_added: 0,
                warnings_added: result.flagged,
                confidence,
            },
        }
    }

    fn recover(&self, error: &RecoveryError, source: &str, from: &str, to: &str) -> Conversion {
        tracing::warn!(from, to, %error, "parse failed, recovering line by line");
        let recovery = recovery::recover_from_parse_error(source, error, |line| {
            legacy::rewrite_line(from, to, line)
        });
        let warnings = recovery.warnings.len();
        // No classification exists without a parse; score from how much of
        // the file needed salvage, never above the legacy ceiling.
        let confidence = LEGACY_CONFIDENCE_CEILING
            .saturating_sub((5 * warnings).min(u8::MAX as usize) as u8)
            .max(10);
        Conversion {
            code: recovery.recovered,
            outcome: FileOutcome {
                status: FileStatus::Converted,
                stage: Some(EmitStage::Recovery),
                todos_added: 0,
                warnings_added: warnings,
                confidence,
            },
        }
    }

    fn traced_outcome(
        code: String,
        trace: &EmitTrace,
        stage: EmitStage,
        cap: Option<u8>,
    ) -> Conversion {
        let classification = Classification::from_trace(trace);
        let mut confidence = score(&classification);
        if let Some(cap) = cap {
            confidence = confidence.min(cap);
        }
        Conversion {
            code,
            outcome: FileOutcome {
                status: FileStatus::Converted,
                stage: Some(stage),
                todos_added: trace.unconvertible(),
                warnings_added: trace.warned(),
                confidence,
            },
        }
    }
}
