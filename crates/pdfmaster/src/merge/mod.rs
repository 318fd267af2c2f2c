//! PDF merging.
//!
//! This module provides:
//! - [`PageAccumulator`]: copies pages of successive documents into one
//! - [`Merger`]: loads uploaded files in order and drives the accumulator
//! - [`merge_files`]: convenience entry point with default settings

pub mod merger;
pub mod pages;

pub use merger::{MIN_FILES, MergeOutput, MergeStatistics, Merger};
pub use pages::PageAccumulator;

use crate::error::Result;
use crate::files::UploadedFile;

/// Merge `files` in order using a default [`Merger`].
///
/// # Errors
///
/// See [`Merger::merge`].
pub async fn merge_files(files: &[UploadedFile]) -> Result<MergeOutput> {
    Merger::new().merge(files).await
}
