//! Download delivery.
//!
//! A finished merge is wrapped in a [`Download`] and handed to a
//! [`DownloadSink`] exactly once. [`DirectorySink`] writes it into a
//! directory; [`MemorySink`] keeps it in memory.

use chrono::{NaiveDate, Utc};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{PdfMasterError, Result};
use crate::io::PdfWriter;

/// Merged PDF ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name, `merged_<YYYY-MM-DD>.pdf`.
    pub filename: String,
    /// PDF bytes.
    pub bytes: Vec<u8>,
}

impl Download {
    /// Wrap `bytes` under the name for today's UTC date.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            filename: merged_filename_today(),
            bytes,
        }
    }

    /// Wrap `bytes` under an explicit name.
    pub fn with_filename(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Where and how big a delivered download ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    /// File name the download was delivered under.
    pub filename: String,
    /// Final location, for sinks that write to disk.
    pub location: Option<PathBuf>,
    /// Size in bytes.
    pub size: u64,
}

/// `merged_<YYYY-MM-DD>.pdf` for `date`.
pub fn merged_filename(date: NaiveDate) -> String {
    format!("merged_{}.pdf", date.format("%Y-%m-%d"))
}

/// `merged_<YYYY-MM-DD>.pdf` for the current UTC date.
pub fn merged_filename_today() -> String {
    merged_filename(Utc::now().date_naive())
}

/// Destination for finished merges.
pub trait DownloadSink {
    /// Deliver `download`. Called once per successful merge; the sink owns
    /// the bytes afterwards.
    fn deliver(&self, download: Download) -> impl Future<Output = Result<Delivered>> + Send;
}

/// Writes downloads into a directory.
///
/// File names are dated, not unique: a second merge on the same day
/// replaces the earlier `merged_<date>.pdf`. The replacement is atomic, so
/// readers see either the old file or the new one.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    writer: PdfWriter,
}

impl DirectorySink {
    /// Sink writing atomically into `directory`, created on first delivery.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            writer: PdfWriter::new(),
        }
    }

    /// Target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl DownloadSink for DirectorySink {
    async fn deliver(&self, download: Download) -> Result<Delivered> {
        let Download { filename, bytes } = download;

        // Only a bare file name may land in the directory.
        if Path::new(&filename).file_name().and_then(|n| n.to_str()) != Some(filename.as_str()) {
            return Err(PdfMasterError::other(format!(
                "Invalid download file name: {filename}"
            )));
        }

        let path = self.directory.join(&filename);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "replacing earlier download");
        }
        let stats = self.writer.write_bytes(&bytes, &path).await?;

        tracing::debug!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            "download written"
        );

        Ok(Delivered {
            filename,
            location: Some(stats.output_path),
            size: stats.file_size,
        })
    }
}

/// Keeps every delivered download in memory. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    downloads: Arc<Mutex<Vec<Download>>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads delivered so far, oldest first.
    pub fn downloads(&self) -> Vec<Download> {
        self.downloads
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Number of downloads delivered so far.
    pub fn len(&self) -> usize {
        self.downloads.lock().map(|d| d.len()).unwrap_or_default()
    }

    /// True if nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DownloadSink for MemorySink {
    async fn deliver(&self, download: Download) -> Result<Delivered> {
        let delivered = Delivered {
            filename: download.filename.clone(),
            location: None,
            size: download.size(),
        };

        self.downloads
            .lock()
            .map_err(|_| PdfMasterError::other("Download store poisoned"))?
            .push(download);

        Ok(delivered)
    }
}
