//! CLI argument parsing for pdfmaster.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled into the build script to render the man page, so it
//! refers to the library only through `pdfmaster::` paths.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use pdfmaster::config::Config;
use pdfmaster::error::{PdfMasterError, Result};
use pdfmaster::intake::IntakeSource;

/// Combine PDF files into a single document.
///
/// Files are merged in the order given and the result is written as
/// merged_<YYYY-MM-DD>.pdf into the download directory. With --interactive
/// the files can be added, removed and reordered before merging.
#[derive(Parser, Debug)]
#[command(name = "pdfmaster")]
#[command(version)]
#[command(about = "Combine PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Glob patterns are expanded. At least two files are needed for a
    /// merge.
    ///
    /// Examples:
    ///   pdfmaster a.pdf b.pdf
    ///   pdfmaster chapter*.pdf -d out/
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Directory that receives the merged PDF
    ///
    /// Created if it does not exist.
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        default_value = ".",
        env = "PDFMASTER_DOWNLOAD_DIR"
    )]
    pub download_dir: PathBuf,

    /// Treat FILE arguments as a drag-and-drop payload
    ///
    /// Only files with a .pdf extension are kept; everything else is
    /// silently skipped. Without this flag every file is taken as picked.
    #[arg(long)]
    pub drop: bool,

    /// Open an interactive shell with FILE preloaded
    ///
    /// Type `help` in the shell for the list of commands.
    #[arg(short, long)]
    pub interactive: bool,

    /// Pause before merging, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 800)]
    pub delay_ms: u64,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show detailed output and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the final session state as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMasterError::InvalidConfig`] if validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let intake = if self.drop {
            IntakeSource::Drop
        } else {
            IntakeSource::Picker
        };

        let config = Config {
            inputs: self.files.clone(),
            download_dir: self.download_dir.clone(),
            intake,
            processing_delay: Duration::from_millis(self.delay_ms),
            assume_yes: self.yes,
            interactive: self.interactive,
            quiet: self.quiet,
            verbose: self.verbose,
            json: self.json,
        };

        config.validate().map_err(|e| {
            PdfMasterError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Default log filter for the chosen verbosity.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "pdfmaster=debug,pdfmaster_cli=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
