//! Read-only directory analysis.
//!
//! Scores every file against every registered adapter's `detect` heuristic
//! and produces the analysis report: which frameworks are present, which
//! conversion directions the registry supports for them, and how confident
//! detection is per file. I/O stays in the caller; this works on in-memory
//! `(path, content)` pairs.

use hamlet_common::limits::DETECTION_CANDIDATE_THRESHOLD;
use hamlet_common::report::{
    AnalysisReport, AnalysisSummary, AnalyzedFile, ReportMeta, SCHEMA_VERSION,
};
use hamlet_frameworks::registry::FrameworkRegistry;

/// One file handed to the analyzer.
#[derive(Clone, Debug)]
pub struct AnalyzerEntry {
    pub path: String,
    pub content: String,
}

impl AnalyzerEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        AnalyzerEntry {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Two candidates scoring within this margin flag the file as ambiguous.
const AMBIGUITY_MARGIN: u8 = 10;

/// Analyze a set of files against the registry's adapters.
pub fn analyze(
    registry: &FrameworkRegistry,
    root: &str,
    tool_version: &str,
    entries: &[AnalyzerEntry],
) -> AnalysisReport {
    let mut files: Vec<AnalyzedFile> = Vec::with_capacity(entries.len());
    let mut frameworks_detected: Vec<String> = Vec::new();
    let mut confidence_sum = 0u64;
    let mut test_file_count = 0usize;

    for entry in entries {
        let analyzed = analyze_file(registry, entry);
        if !analyzed.candidates.is_empty() {
            test_file_count += 1;
            confidence_sum += u64::from(analyzed.confidence);
            let best = &analyzed.candidates[0];
            if !frameworks_detected.contains(best) {
                frameworks_detected.push(best.clone());
            }
        }
        files.push(analyzed);
    }

    // Path ordering is part of the report contract.
    files.sort_by(|a, b| a.path.cmp(&b.path));
    frameworks_detected.sort();

    let confidence_avg = if test_file_count == 0 {
        0.0
    } else {
        confidence_sum as f64 / test_file_count as f64
    };

    tracing::debug!(
        files = entries.len(),
        test_files = test_file_count,
        "analysis complete"
    );

    AnalysisReport {
        schema_version: SCHEMA_VERSION,
        meta: ReportMeta::now(tool_version, root),
        summary: AnalysisSummary {
            file_count: entries.len(),
            test_file_count,
            frameworks_detected,
            directions_supported: registry.supported_directions(),
            confidence_avg,
        },
        files,
    }
}

fn analyze_file(registry: &FrameworkRegistry, entry: &AnalyzerEntry) -> AnalyzedFile {
    // Registration order breaks score ties, keeping output deterministic.
    let mut scored: Vec<(&'static str, u8, &'static str)> = Vec::new();
    for adapter in registry.adapters() {
        let score = adapter.detect(&entry.content);
        if score >= DETECTION_CANDIDATE_THRESHOLD {
            scored.push((adapter.name(), score, adapter.kind().as_str()));
        }
    }
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut warnings: Vec<String> = Vec::new();
    let (file_type, confidence) = match scored.first() {
        Some(&(_, best_score, kind)) => {
            if let Some(&(second, second_score, _)) = scored.get(1) {
                if best_score - second_score < AMBIGUITY_MARGIN {
                    warnings.push(format!(
                        "ambiguous detection: {} and {} score within {} points",
                        scored[0].0, second, AMBIGUITY_MARGIN
                    ));
                }
            }
            (kind.to_string(), best_score)
        }
        None => {
            warnings.push("no known test framework detected".to_string());
            ("unknown".to_string(), 0)
        }
    };

    AnalyzedFile {
        path: entry.path.clone(),
        file_type,
        candidates: scored.iter().map(|(name, _, _)| (*name).to_string()).collect(),
        confidence,
        warnings,
    }
}
