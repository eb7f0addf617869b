//! Termscan command-line shell.
//!
//! This is the thin shell: flag parsing, logging bootstrap, allow-list
//! filtering of surviving lines, and exit status. Core logic lives in the
//! `crates/` directory.

use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use termscan_core::{ScanOptions, ScanSettings, PROBLEM_PREFIX};
use termscan_db::{AllowDb, TermDatabase};
use termscan_scanner::ScanOrchestrator;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "termscan", version, about = "Precommit scanner for blocked terminology")]
struct Cli {
    /// Enable progress and debug reporting
    #[arg(long)]
    verbose: bool,
    /// Do not honor the inline 'term-allowed' suppression marker
    #[arg(long)]
    no_term_allowed: bool,
    /// Skip the allow-list check, reporting every match
    #[arg(long)]
    ignore_allowed_db: bool,
    /// Files or directories to scan; '-' reads additional paths from stdin
    files: Vec<String>,
}

/// Initialize tracing subscriber for logging.
///
/// Diagnostics go to stderr so findings on stdout are never corrupted.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "info,termscan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Expand the positional path list, pulling additional paths from stdin
/// wherever `-` appears.
fn gather_paths(files: &[String], stdin: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut paths = Vec::new();
    let mut stdin = Some(stdin);
    for path in files {
        if path == "-" {
            if let Some(reader) = stdin.take() {
                for line in reader.lines() {
                    let line = line?;
                    let line = line.trim();
                    if !line.is_empty() {
                        paths.push(line.to_string());
                    }
                }
            }
        } else {
            paths.push(path.clone());
        }
    }
    Ok(paths)
}

async fn run(cli: Cli) -> anyhow::Result<u64> {
    let settings = ScanSettings::load_with_env().context("loading settings")?;
    let options = ScanOptions {
        verbose: cli.verbose,
        no_term_allowed: cli.no_term_allowed,
        ignore_allowed_db: cli.ignore_allowed_db,
    };

    // Both stores load before any scanning starts; malformed content aborts
    // the run here rather than producing wrong results later.
    let db = TermDatabase::load(Path::new(&settings.block_db_path))
        .context("loading blocked-term database")?;
    let allowed =
        AllowDb::load(Path::new(&settings.allow_db_path)).context("loading allow-list")?;

    let paths = gather_paths(&cli.files, std::io::stdin().lock())?;
    info!("Scanning {} paths with {} workers", paths.len(), settings.workers);

    let orchestrator = ScanOrchestrator::with_grep(Arc::new(db), settings, options);
    let mut results = orchestrator.scan(paths);

    let mut num_found: u64 = 0;
    while let Some(batch) = results.recv().await {
        let batch = batch.context("scan aborted")?;
        for line in batch.lines {
            if options.ignore_allowed_db || !allowed.contains_line(&line) {
                println!("{PROBLEM_PREFIX} {line}");
                num_found += 1;
            }
        }
    }

    info!("Found {} problems", num_found);
    Ok(num_found)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_paths_passthrough() {
        let paths =
            gather_paths(&["a.txt".to_string(), "src".to_string()], std::io::empty())
                .expect("gather paths");
        assert_eq!(paths, vec!["a.txt", "src"]);
    }

    #[test]
    fn test_gather_paths_reads_stdin_for_dash() {
        let stdin = "from_stdin.txt\n\n  spaced.txt  \n";
        let paths = gather_paths(
            &["a.txt".to_string(), "-".to_string()],
            stdin.as_bytes(),
        )
        .expect("gather paths");
        assert_eq!(paths, vec!["a.txt", "from_stdin.txt", "spaced.txt"]);
    }
}
