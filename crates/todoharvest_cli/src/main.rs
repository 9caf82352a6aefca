//! One-shot TODO import entry point.
//!
//! # Responsibility
//! - Parse arguments, initialize logging, run the import batch once.
//! - Print the run summary and map failures to the exit code.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use todoharvest_core::{default_log_level, init_logging, run_import, ImportOptions};

/// Scans note files for TODO markers and merges tasks into per-tag stores.
#[derive(Debug, Parser)]
#[command(name = "todoharvest", version)]
struct Args {
    /// Note file or directory of note files to scan.
    #[arg(long)]
    input: PathBuf,

    /// Task root directory holding the per-tag stores.
    #[arg(long)]
    output: PathBuf,

    /// Note file extension (without dot) used for directory scans.
    #[arg(long, default_value = "md")]
    ext: String,

    /// Log directory; defaults to the task root.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_dir = args.log_dir.clone().unwrap_or_else(|| args.output.clone());
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(message) = init_logging(&log_level, &log_dir) {
        eprintln!("todoharvest: {message}");
        return ExitCode::FAILURE;
    }

    let options = ImportOptions {
        input: args.input,
        taskroot: args.output,
        note_ext: args.ext,
    };

    let summary = match run_import(&options) {
        Ok(summary) => summary,
        Err(err) => {
            error!("event=run module=cli status=error error={err}");
            return ExitCode::FAILURE;
        }
    };

    for line in summary.report_lines() {
        println!("{line}");
    }

    if summary.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
