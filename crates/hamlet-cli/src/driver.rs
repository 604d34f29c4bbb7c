//! File walking, conversion, and report writing for the hamlet binary.
//!
//! All filesystem work lives here; the core crates only see in-memory text.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use hamlet_common::report::{
    AnalysisReport, ConversionReport, Direction, FileReport, FileStatus, ReportMeta,
};
use hamlet_pipeline::{analyze, shared_pipeline, AnalyzerEntry};

use crate::args::{AnalyzeArgs, ConvertArgs};

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extensions worth looking at when walking a directory. Per-framework
/// extension matching narrows this further for conversion.
const CANDIDATE_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs"];

const SKIP_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

pub fn run_convert(args: &ConvertArgs) -> Result<ConversionReport> {
    let pipeline = shared_pipeline();
    let route = pipeline.registry().resolve(&args.from, &args.to)?;

    let root = args.path.as_path();
    let meta = ReportMeta::now(TOOL_VERSION, &root.display().to_string());
    let mut report = ConversionReport::new(
        meta,
        Direction {
            from: args.from.clone(),
            to: args.to.clone(),
            pipeline_backed: route.pipeline_backed,
        },
    );

    for path in collect_files(root)? {
        let display = display_path(&path, root);
        if !matches_extensions(&path, route.source.file_extensions()) {
            report.push_file(FileReport {
                path: display.clone(),
                status: FileStatus::Skipped,
                stage: None,
                todos_added: 0,
                warnings_added: 0,
                confidence: 0,
            });
            print_file_line(&display, FileStatus::Skipped, 0);
            continue;
        }

        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let conversion = pipeline.convert(&source, &args.from, &args.to)?;
        let outcome = &conversion.outcome;

        if outcome.status == FileStatus::Converted && !args.dry_run {
            let out_path = output_path(&path, root, args.out_dir.as_deref(), &route)?;
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&out_path, &conversion.code)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            tracing::debug!(input = %path.display(), output = %out_path.display(), "wrote converted file");
        }

        print_file_line(&display, outcome.status, outcome.confidence);
        report.push_file(FileReport {
            path: display,
            status: outcome.status,
            stage: outcome.stage,
            todos_added: outcome.todos_added,
            warnings_added: outcome.warnings_added,
            confidence: outcome.confidence,
        });
    }

    print_convert_summary(&report);
    if let Some(report_path) = &args.report {
        write_report(report_path, &serde_json::to_string_pretty(&report)?)?;
    }
    Ok(report)
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let pipeline = shared_pipeline();
    let root = args.path.as_path();

    let mut entries = Vec::new();
    for path in collect_files(root)? {
        match fs::read_to_string(&path) {
            Ok(content) => entries.push(AnalyzerEntry::new(display_path(&path, root), content)),
            Err(err) => tracing::warn!(path = %path.display(), %err, "skipping unreadable file"),
        }
    }

    let report = analyze(
        pipeline.registry(),
        &root.display().to_string(),
        TOOL_VERSION,
        &entries,
    );
    print_analyze_summary(&report);
    if let Some(report_path) = &args.report {
        write_report(report_path, &serde_json::to_string_pretty(&report)?)?;
    }
    Ok(report)
}

/// All candidate files under `root`, or `root` itself when it is a file.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        anyhow::bail!("no such file or directory: {}", root.display());
    }
    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        // Depth 0 is the root the user named; never prune it, even when
        // its own name is dotted (`.`, a dot-directory given explicitly).
        entry.depth() == 0
            || entry
                .file_name()
                .to_str()
                .is_none_or(|name| !SKIP_DIRS.contains(&name) && !name.starts_with('.'))
    });
    for entry in walker {
        let entry = entry.context("directory walk failed")?;
        if entry.file_type().is_file() && matches_extensions(entry.path(), CANDIDATE_EXTENSIONS) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn matches_extensions(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| name.ends_with(ext))
}

/// Where a converted file lands: under `--out-dir` mirroring the input
/// layout, or replacing the input file, with the framework extension mapped
/// (e.g. `login.cy.js` -> `login.spec.ts` is NOT forced; only the matched
/// suffix is swapped when the target uses a different one).
fn output_path(
    input: &Path,
    root: &Path,
    out_dir: Option<&Path>,
    route: &hamlet_frameworks::Route,
) -> Result<PathBuf> {
    let mapped_name = map_extension(
        input
            .file_name()
            .and_then(|n| n.to_str())
            .context("input path has no file name")?,
        route.source.file_extensions(),
        route.target.file_extensions(),
    );
    let base = match out_dir {
        Some(dir) => {
            let relative = input.strip_prefix(root).unwrap_or(input);
            dir.join(relative)
        }
        None => input.to_path_buf(),
    };
    Ok(base.with_file_name(mapped_name))
}

fn map_extension(name: &str, from: &[&str], to: &[&str]) -> String {
    // Longest suffix first so `.cy.js` wins over `.js`.
    let mut candidates: Vec<&str> = from.to_vec();
    candidates.sort_by_key(|ext| std::cmp::Reverse(ext.len()));
    for ext in candidates {
        if let Some(stem) = name.strip_suffix(ext) {
            let target_ext = to
                .iter()
                // Prefer a target extension with the same language suffix.
                .find(|t| t.ends_with(ext.rsplit('.').next().unwrap_or("js")))
                .or_else(|| to.first())
                .copied()
                .unwrap_or(ext);
            return format!("{stem}{target_ext}");
        }
    }
    name.to_string()
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_file_line(path: &str, status: FileStatus, confidence: u8) {
    match status {
        FileStatus::Converted => {
            println!("{} {path} (confidence {confidence})", "converted".green());
        }
        FileStatus::Skipped => println!("{}   {path}", "skipped".yellow()),
        FileStatus::Failed => println!("{}    {path}", "failed".red()),
    }
}

fn print_convert_summary(report: &ConversionReport) {
    let totals = &report.results;
    println!();
    println!(
        "{} {} converted, {} skipped, {} failed ({} -> {}, {})",
        "done:".bold(),
        totals.files_converted,
        totals.files_skipped,
        totals.files_failed,
        report.plan.direction.from,
        report.plan.direction.to,
        if report.plan.direction.pipeline_backed {
            "pipeline-backed"
        } else {
            "best-effort"
        }
    );
    if totals.todos_added > 0 || totals.warnings_added > 0 {
        println!(
            "{} {} TODOs and {} warnings need review",
            "note:".yellow().bold(),
            totals.todos_added,
            totals.warnings_added
        );
    }
}

fn print_analyze_summary(report: &AnalysisReport) {
    let summary = &report.summary;
    println!(
        "{} {} files scanned, {} test files",
        "analyzed:".bold(),
        summary.file_count,
        summary.test_file_count
    );
    if !summary.frameworks_detected.is_empty() {
        println!("frameworks: {}", summary.frameworks_detected.join(", "));
        println!("average detection confidence: {:.0}", summary.confidence_avg);
    }
}

fn write_report(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_extension_prefers_longest_suffix() {
        let mapped = map_extension(
            "login.cy.js",
            &[".cy.js", ".cy.ts"],
            &[".spec.ts", ".spec.js"],
        );
        assert_eq!(mapped, "login.spec.js");
    }

    #[test]
    fn test_map_extension_keeps_unmatched_name() {
        assert_eq!(map_extension("notes.txt", &[".test.js"], &[".spec.js"]), "notes.txt");
    }

    #[test]
    fn test_matches_extensions() {
        assert!(matches_extensions(Path::new("a/b/cart.test.js"), &[".test.js"]));
        assert!(!matches_extensions(Path::new("a/b/cart.js"), &[".test.js"]));
    }
}
