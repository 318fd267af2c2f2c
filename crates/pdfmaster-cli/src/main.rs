//! pdfmaster - Combine PDF files into a single document.
//!
//! One-shot mode merges the given files and exits; interactive mode opens a
//! shell for building up the list first.

mod cli;
mod shell;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::shell::{Shell, announce_merge};
use pdfmaster::download::{DirectorySink, DownloadSink};
use pdfmaster::error::Result;
use pdfmaster::intake::handles_from_patterns;
use pdfmaster::output::{OutputFormatter, display_merge_report};
use pdfmaster::session::MergeSession;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.default_log_filter());

    if let Err(err) = run(cli).await {
        // Validation and processing failures were already reported through
        // the session status.
        if !err.is_validation() && !err.is_processing() {
            eprintln!("Error: {err}");
        }
        process::exit(err.exit_code());
    }
}

/// Log to stderr, filtered by `RUST_LOG` or `default_filter`.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfmaster::NAME, pdfmaster::VERSION));
        formatter.detail("Download directory", &config.download_dir.display().to_string());
    }

    let mut session = MergeSession::with_config(
        DirectorySink::new(&config.download_dir),
        config.session_config(),
    );

    if !config.inputs.is_empty() {
        let handles = handles_from_patterns(&config.inputs)?;
        let added = session.add_files(config.intake, handles)?;
        formatter.debug(&format!("Added {added} of {} input(s)", config.inputs.len()));
    }

    let result = if config.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        Shell::new(&mut session, &formatter, &config, stdin).run().await
    } else {
        merge_once(&mut session, &formatter).await
    };

    if config.json {
        println!("{}", session.snapshot().to_json()?);
    }

    result
}

/// Merge the preloaded files once.
async fn merge_once<S: DownloadSink>(
    session: &mut MergeSession<S>,
    formatter: &OutputFormatter,
) -> Result<()> {
    announce_merge(formatter, session);

    match session.merge().await {
        Ok(report) => {
            display_merge_report(formatter, &report);
            Ok(())
        }
        Err(err) => {
            formatter.status(session.state());
            Err(err)
        }
    }
}
