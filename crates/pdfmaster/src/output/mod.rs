//! Output formatting and display for pdfmaster.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The numbered file listing
//! - Merge summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfmaster::output::OutputFormatter;
//! use pdfmaster::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;
pub mod grid;

pub use formatter::{MessageLevel, OutputFormatter};
pub use grid::{render_file_grid, selection_label};

use crate::session::MergeReport;

/// Display the outcome of a successful merge.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    let stats = &report.statistics;
    let target = report
        .delivered
        .location
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| report.delivered.filename.clone());

    formatter.success(&format!(
        "Merged {} files ({} pages) into {}",
        stats.files_merged, stats.total_pages, target
    ));

    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Output size", &stats.format_output_size());
    formatter.detail("Load time", &format!("{:.2?}", stats.load_time));
    formatter.detail("Total time", &format!("{:.2?}", stats.merge_time));
}
