//! JSON report contracts.
//!
//! Two reports are produced: the conversion report (one per `convert`
//! invocation) and the analysis report (directory-level read-only scan).
//! Field names are camelCase on the wire and versioned via `schemaVersion`;
//! downstream tooling parses these, so shapes only change with a version
//! bump.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current schema version for both report kinds.
pub const SCHEMA_VERSION: u32 = 1;

/// Shared report metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub tool_version: String,
    pub runtime_version: String,
    /// Milliseconds since the Unix epoch.
    pub generated_at: u64,
    /// Root path the invocation operated on.
    pub root: String,
}

impl ReportMeta {
    /// Build metadata stamped with the current time.
    pub fn now(tool_version: &str, root: &str) -> Self {
        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        ReportMeta {
            tool_version: tool_version.to_string(),
            runtime_version: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            generated_at,
            root: root.to_string(),
        }
    }
}

/// The declared conversion direction, resolved against the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Direction {
    pub from: String,
    pub to: String,
    /// Whether a full IR-to-IR route exists for this pair, versus only a
    /// legacy text-rewrite route.
    pub pipeline_backed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPlan {
    pub direction: Direction,
}

/// Per-file conversion status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Converted,
    Skipped,
    Failed,
}

/// Which emission stage produced the output for a file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmitStage {
    /// Full-IR emission via the target adapter.
    FullIr,
    /// Per-node emissions spliced at provenance spans.
    IrPatch,
    /// Whole-text pattern rewrite without IR.
    Legacy,
    /// Per-line salvage after a whole-document parse failure.
    Recovery,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<EmitStage>,
    pub todos_added: usize,
    pub warnings_added: usize,
    /// 0-100; how much of the file's semantics survived without blocking
    /// annotations.
    pub confidence: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultTotals {
    pub files_converted: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub todos_added: usize,
    pub warnings_added: usize,
}

/// The per-invocation conversion report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub schema_version: u32,
    pub meta: ReportMeta,
    pub plan: ConversionPlan,
    pub results: ResultTotals,
    pub files: Vec<FileReport>,
}

impl ConversionReport {
    pub fn new(meta: ReportMeta, direction: Direction) -> Self {
        ConversionReport {
            schema_version: SCHEMA_VERSION,
            meta,
            plan: ConversionPlan { direction },
            results: ResultTotals::default(),
            files: Vec::new(),
        }
    }

    /// Record one file outcome, updating the aggregate totals.
    pub fn push_file(&mut self, file: FileReport) {
        match file.status {
            FileStatus::Converted => self.results.files_converted += 1,
            FileStatus::Skipped => self.results.files_skipped += 1,
            FileStatus::Failed => self.results.files_failed += 1,
        }
        self.results.todos_added += file.todos_added;
        self.results.warnings_added += file.warnings_added;
        self.files.push(file);
    }
}

// ---------------------------------------------------------------------------
// Analysis report
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub file_count: usize,
    pub test_file_count: usize,
    pub frameworks_detected: Vec<String>,
    pub directions_supported: Vec<String>,
    pub confidence_avg: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedFile {
    pub path: String,
    /// "unit", "browser", or "unknown".
    #[serde(rename = "type")]
    pub file_type: String,
    /// Candidate frameworks, best match first.
    pub candidates: Vec<String>,
    pub confidence: u8,
    pub warnings: Vec<String>,
}

/// The directory-level analysis report. `files` is sorted lexicographically
/// by path; that ordering is part of the contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub meta: ReportMeta,
    pub summary: AnalysisSummary,
    pub files: Vec<AnalyzedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReportMeta {
        ReportMeta {
            tool_version: "0.1.0".to_string(),
            runtime_version: "test".to_string(),
            generated_at: 0,
            root: ".".to_string(),
        }
    }

    #[test]
    fn test_conversion_report_wire_keys() {
        let mut report = ConversionReport::new(
            meta(),
            Direction {
                from: "jest".to_string(),
                to: "vitest".to_string(),
                pipeline_backed: true,
            },
        );
        report.push_file(FileReport {
            path: "a.test.js".to_string(),
            status: FileStatus::Converted,
            stage: Some(EmitStage::FullIr),
            todos_added: 1,
            warnings_added: 2,
            confidence: 88,
        });

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert!(value.get("schemaVersion").is_some());
        assert!(value["meta"].get("toolVersion").is_some());
        assert!(value["meta"].get("generatedAt").is_some());
        assert!(value["plan"]["direction"].get("pipelineBacked").is_some());
        assert_eq!(value["results"]["filesConverted"], 1);
        assert_eq!(value["results"]["todosAdded"], 1);
        assert_eq!(value["files"][0]["status"], "converted");
        assert_eq!(value["files"][0]["stage"], "full-ir");
        assert!(value["files"][0].get("todosAdded").is_some());
    }

    #[test]
    fn test_totals_accumulate() {
        let mut report = ConversionReport::new(
            meta(),
            Direction {
                from: "cypress".to_string(),
                to: "playwright".to_string(),
                pipeline_backed: true,
            },
        );
        for status in [FileStatus::Converted, FileStatus::Failed, FileStatus::Converted] {
            report.push_file(FileReport {
                path: "x".to_string(),
                status,
                stage: None,
                todos_added: 1,
                warnings_added: 0,
                confidence: 50,
            });
        }
        assert_eq!(report.results.files_converted, 2);
        assert_eq!(report.results.files_failed, 1);
        assert_eq!(report.results.todos_added, 3);
    }

    #[test]
    fn test_analysis_file_type_key_is_type() {
        let file = AnalyzedFile {
            path: "a.spec.ts".to_string(),
            file_type: "unit".to_string(),
            candidates: vec!["vitest".to_string()],
            confidence: 90,
            warnings: vec![],
        };
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["type"], "unit");
    }
}
