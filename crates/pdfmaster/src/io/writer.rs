//! PDF serialization and file writing.
//!
//! This module provides:
//! - Serialization of a document into an in-memory buffer
//! - Atomic writes (write to a temp file, then rename)
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfmaster::io::PdfWriter;
//! use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use lopdf::Document;
use tokio::task;

use crate::error::{PdfMasterError, Result};
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Serializes documents and writes finished PDFs to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize a document into a byte buffer.
    ///
    /// Unreachable objects are dropped, the rest renumbered and streams
    /// compressed. Runs on a blocking task. The document is consumed.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMasterError::MergeFailed`] if serialization fails.
    pub async fn serialize(&self, mut doc: Document) -> Result<Vec<u8>> {
        task::spawn_blocking(move || {
            doc.prune_objects();
            doc.renumber_objects();
            doc.compress();

            let mut buffer = Vec::new();
            doc.save_to(&mut buffer).map_err(|e| {
                PdfMasterError::merge_failed(format!("Failed to serialize document: {e}"))
            })?;

            Ok(buffer)
        })
        .await?
    }

    /// Write `bytes` to `path`, creating parent directories as needed.
    ///
    /// The bytes land in a sibling temporary file first and are renamed
    /// into place, so a failed write never leaves a truncated file at
    /// `path`. An existing file at `path` is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The file cannot be created or written
    /// - The rename fails
    pub async fn write_bytes(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let bytes = bytes.to_vec();

        task::spawn_blocking(move || {
            let start = Instant::now();

            if let Some(parent) = path_buf.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PdfMasterError::FailedToCreateOutput {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }

            let temp_path = temp_path_for(&path_buf);

            if let Err(err) = write_file(&temp_path, &bytes) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(err);
            }

            std::fs::rename(&temp_path, &path_buf).map_err(|e| {
                let _ = std::fs::remove_file(&temp_path);
                PdfMasterError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e,
                }
            })?;

            Ok(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await?
    }
}

/// Sibling path used for atomic writes: `merged.pdf` -> `.merged.pdf.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|e| PdfMasterError::FailedToCreateOutput {
        path: path.to_path_buf(),
        source: e,
    })?;

    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| PdfMasterError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
