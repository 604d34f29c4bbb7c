use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the hamlet binary.
#[derive(Parser, Debug)]
#[command(
    name = "hamlet",
    version,
    about = "Convert test suites between testing frameworks"
)]
pub struct CliArgs {
    /// Enable verbose diagnostic logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert test files from one framework to another.
    Convert(ConvertArgs),
    /// Scan a directory and report which frameworks its tests use.
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// A test file or a directory to walk for test files.
    pub path: PathBuf,

    /// Source framework name (e.g. jest, mocha, cypress).
    #[arg(long)]
    pub from: String,

    /// Target framework name (e.g. vitest, playwright).
    #[arg(long)]
    pub to: String,

    /// Write converted files under this directory instead of in place.
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Write the JSON conversion report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Convert and report without writing any output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// A file or directory to analyze.
    pub path: PathBuf,

    /// Write the JSON analysis report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args_parse() {
        let args = CliArgs::parse_from([
            "hamlet", "convert", "tests/", "--from", "jest", "--to", "vitest", "--dry-run",
        ]);
        let Command::Convert(convert) = args.command else {
            panic!("expected convert subcommand");
        };
        assert_eq!(convert.from, "jest");
        assert_eq!(convert.to, "vitest");
        assert!(convert.dry_run);
        assert!(convert.out_dir.is_none());
    }

    #[test]
    fn test_analyze_args_parse() {
        let args = CliArgs::parse_from(["hamlet", "analyze", ".", "--report", "out.json"]);
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze subcommand");
        };
        assert_eq!(analyze.report, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_verbose_is_global() {
        let args = CliArgs::parse_from(["hamlet", "analyze", ".", "--verbose"]);
        assert!(args.verbose);
    }
}
