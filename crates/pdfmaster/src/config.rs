//! Configuration module for pdfmaster.
//!
//! This module holds the validated settings a front-end derives from its
//! arguments. It handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Translation into [`SessionConfig`]

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

use crate::intake::IntakeSource;
use crate::session::{DEFAULT_PROCESSING_DELAY, SessionConfig};

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input paths or glob patterns, in merge order.
    pub inputs: Vec<String>,

    /// Directory that receives `merged_<date>.pdf`.
    pub download_dir: PathBuf,

    /// How command-line inputs are taken in.
    pub intake: IntakeSource,

    /// Pause before merging.
    pub processing_delay: Duration,

    /// Answer yes to every confirmation.
    pub assume_yes: bool,

    /// Run the interactive shell instead of a single merge.
    pub interactive: bool,

    /// Suppress non-error output.
    pub quiet: bool,

    /// Show detailed output.
    pub verbose: bool,

    /// Print the session snapshot as JSON when done.
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            download_dir: PathBuf::from("."),
            intake: IntakeSource::Picker,
            processing_delay: DEFAULT_PROCESSING_DELAY,
            assume_yes: false,
            interactive: false,
            quiet: false,
            verbose: false,
            json: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration contains invalid combinations.
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.download_dir.as_os_str().is_empty() {
            bail!("Download directory cannot be empty");
        }

        if self.download_dir.exists() && !self.download_dir.is_dir() {
            bail!(
                "Download directory is not a directory: {}",
                self.download_dir.display()
            );
        }

        Ok(())
    }

    /// Session settings derived from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            processing_delay: self.processing_delay,
        }
    }

    /// Check if regular output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if detailed output should be displayed.
    pub fn should_print_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}
