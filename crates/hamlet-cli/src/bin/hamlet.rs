use anyhow::Result;
use clap::Parser;

use hamlet_cli::args::{CliArgs, Command};
use hamlet_cli::driver;
use hamlet_frameworks::registry::ConfigError;

/// Exit code for configuration errors (unknown framework, bad direction).
const EXIT_CONFIG: i32 = 2;
/// Exit code when at least one file failed to convert.
const EXIT_FAILED_FILES: i32 = 1;

fn main() {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = if err.downcast_ref::<ConfigError>().is_some() {
                EXIT_CONFIG
            } else {
                EXIT_FAILED_FILES
            };
            std::process::exit(code);
        }
    }
}

fn run(args: &CliArgs) -> Result<i32> {
    match &args.command {
        Command::Convert(convert) => {
            let report = driver::run_convert(convert)?;
            if report.results.files_failed > 0 {
                Ok(EXIT_FAILED_FILES)
            } else {
                Ok(0)
            }
        }
        Command::Analyze(analyze) => {
            driver::run_analyze(analyze)?;
            Ok(0)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Logging goes to stderr so report output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
