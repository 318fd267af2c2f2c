//! Error types for pdfmaster.
//!
//! All fallible operations in the library return [`PdfMasterError`]. The
//! variants keep enough detail for developer logs; the session collapses
//! processing failures into a single user-facing message (see
//! [`crate::session::PROCESSING_ERROR_MESSAGE`]).
//!
//! # Error Categories
//!
//! - **Validation**: not enough files to merge
//! - **Input**: missing paths, unreadable files, unparsable PDFs
//! - **Merge**: page tree manipulation or serialization failed
//! - **Output**: the download could not be written
//! - **Session**: operation refused in the current state

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmaster operations.
pub type Result<T> = std::result::Result<T, PdfMasterError>;

/// Main error type for pdfmaster operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMasterError {
    /// Fewer than two files were selected when a merge was requested.
    #[error("Please select at least 2 PDF files to merge. ({found} selected)")]
    NotEnoughFiles {
        /// Number of files in the list at merge time.
        found: usize,
    },

    /// Input path does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Reading a file's content failed.
    #[error("Failed to read file: {name}\n  Reason: {source}")]
    FailedToRead {
        /// Display name of the file.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The PDF parser rejected the file.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Display name of the file.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// The PDF is encrypted or password protected.
    #[error("PDF is encrypted and cannot be processed: {name}")]
    EncryptedPdf {
        /// Display name of the file.
        name: String,
    },

    /// Copying pages or serializing the accumulator failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// The download target could not be created.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing the download failed.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A merge is in flight; the request was refused.
    #[error("A merge is already in progress")]
    SessionBusy,

    /// The split view has no behaviour yet.
    #[error("Split feature coming soon. Switch back to merge mode to continue")]
    SplitUnavailable,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfMasterError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<anyhow::Error> for PdfMasterError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PdfMasterError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::other(format!("Background task failed: {err}"))
    }
}

impl PdfMasterError {
    /// Create a NotEnoughFiles error.
    pub fn not_enough_files(found: usize) -> Self {
        Self::NotEnoughFiles { found }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// True for the inline validation failure that leaves the session idle
    /// without ever entering the processing phase.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotEnoughFiles { .. })
    }

    /// True for failures raised while reading, parsing, copying or
    /// serializing. These are the ones the session reports generically.
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            Self::FailedToRead { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::MergeFailed { .. }
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Io { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotEnoughFiles { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::MergeFailed { .. } => 6,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::SessionBusy => 1,
            Self::SplitUnavailable => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
