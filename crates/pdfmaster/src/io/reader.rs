//! PDF reading and loading.
//!
//! Reads an uploaded file's full content and parses it into a
//! [`lopdf::Document`]. Parsing is CPU bound, so it runs on a blocking task.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmaster::files::{FileHandle, UploadedFile};
//! use pdfmaster::io::PdfReader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = UploadedFile::new(FileHandle::from_path("chapter1.pdf")?);
//! let loaded = PdfReader::new().load(&file).await?;
//! println!("{} has {} pages", loaded.name, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfMasterError, Result};
use crate::files::UploadedFile;

/// A parsed PDF with load metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The parsed document.
    pub document: Document,

    /// Name of the source file.
    pub name: String,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Size of the raw content in bytes.
    pub file_size: u64,

    /// Time spent reading and parsing.
    pub load_time: Duration,
}

/// Loads uploaded files into the document model.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The content cannot be read
    /// - The parser rejects the content
    /// - The document is encrypted
    pub async fn load(&self, file: &UploadedFile) -> Result<LoadedPdf> {
        let start = Instant::now();
        let name = file.file.name().to_string();

        let bytes = file.file.read_all().await?;
        let file_size = bytes.len() as u64;

        let document = parse(name.clone(), bytes).await?;
        let page_count = document.get_pages().len();

        Ok(LoadedPdf {
            document,
            name,
            page_count,
            file_size,
            load_time: start.elapsed(),
        })
    }
}

/// Parse raw bytes on a blocking task.
async fn parse(name: String, bytes: Vec<u8>) -> Result<Document> {
    task::spawn_blocking(move || {
        let document =
            Document::load_mem(&bytes).map_err(|e| classify(&name, e.to_string()))?;

        if document.trailer.get(b"Encrypt").is_ok() {
            return Err(PdfMasterError::encrypted_pdf(name));
        }

        Ok(document)
    })
    .await?
}

fn classify(name: &str, message: String) -> PdfMasterError {
    let lowered = message.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("password") {
        PdfMasterError::encrypted_pdf(name)
    } else {
        PdfMasterError::failed_to_load_pdf(name, message)
    }
}
