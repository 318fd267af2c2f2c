//! Merge driver.
//!
//! Loads each uploaded file in list order, appends its pages to a
//! [`PageAccumulator`] and serializes the result. Files are processed one
//! at a time; the first failure aborts the whole merge.

use std::time::{Duration, Instant};

use crate::error::{PdfMasterError, Result};
use crate::files::UploadedFile;
use crate::io::{PdfReader, PdfWriter};
use crate::merge::pages::PageAccumulator;
use crate::utils::format_file_size;

/// Fewest files a merge accepts.
pub const MIN_FILES: usize = 2;

/// Statistics about a merge operation.
#[derive(Debug, Clone, Default)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total time taken for the merge, serialization included.
    pub merge_time: Duration,

    /// Time spent reading and parsing the inputs.
    pub load_time: Duration,

    /// Total size of the inputs in bytes.
    pub input_size: u64,

    /// Size of the serialized output in bytes.
    pub output_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Serialized merge result.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// Bytes of the merged PDF.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that concatenates documents page by page.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `files` in order into a single PDF.
    ///
    /// The output holds every page of the first file in its original order,
    /// then every page of the second, and so on.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than [`MIN_FILES`] files are given (nothing is read)
    /// - Any file cannot be read or parsed
    /// - Copying pages or serializing fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfmaster::merge::Merger;
    /// # use pdfmaster::files::UploadedFile;
    /// # async fn example(files: Vec<UploadedFile>) -> Result<(), Box<dyn std::error::Error>> {
    /// let output = Merger::new().merge(&files).await?;
    /// println!("Merged {} files into {} pages",
    ///          output.statistics.files_merged,
    ///          output.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, files: &[UploadedFile]) -> Result<MergeOutput> {
        if files.len() < MIN_FILES {
            return Err(PdfMasterError::not_enough_files(files.len()));
        }

        let merge_start = Instant::now();
        let mut accumulator = PageAccumulator::new();
        let mut load_time = Duration::ZERO;
        let mut input_size = 0u64;

        for (index, file) in files.iter().enumerate() {
            let loaded = self.reader.load(file).await?;

            tracing::debug!(
                index = index + 1,
                total = files.len(),
                name = %loaded.name,
                pages = loaded.page_count,
                "copying pages"
            );

            load_time += loaded.load_time;
            input_size += loaded.file_size;
            accumulator.append(loaded.document)?;
        }

        let total_pages = accumulator.page_count();
        let bytes = self.writer.serialize(accumulator.into_document()).await?;

        let statistics = MergeStatistics {
            files_merged: files.len(),
            total_pages,
            merge_time: merge_start.elapsed(),
            load_time,
            input_size,
            output_size: bytes.len() as u64,
        };

        tracing::info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            bytes = statistics.output_size,
            elapsed_ms = statistics.merge_time.as_millis() as u64,
            "merge finished"
        );

        Ok(MergeOutput { bytes, statistics })
    }
}
