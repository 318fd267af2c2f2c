//! pdfmaster - Combine PDF files into a single document.
//!
//! This library holds the state and pipeline of a small PDF merge tool:
//!
//! - File intake from drop and picker sources
//! - An ordered, user-reorderable file list
//! - Sequential page-by-page merging on top of `lopdf`
//! - Delivery of the result to a download sink
//! - A session tying these together with a processing status
//!
//! # Examples
//!
//! ## Session
//!
//! ```no_run
//! use pdfmaster::download::DirectorySink;
//! use pdfmaster::intake::{IntakeSource, handles_from_patterns};
//! use pdfmaster::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new(DirectorySink::new("downloads"));
//! session.add_files(IntakeSource::Drop, handles_from_patterns(["scans/*.pdf"])?)?;
//!
//! let report = session.merge().await?;
//! println!("Created {} page document", report.statistics.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfmaster::files::{FileHandle, UploadedFile};
//! use pdfmaster::merge;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![
//!     UploadedFile::new(FileHandle::from_path("a.pdf")?),
//!     UploadedFile::new(FileHandle::from_path("b.pdf")?),
//! ];
//! let output = merge::merge_files(&files).await?;
//! std::fs::write("merged.pdf", &output.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod download;
pub mod error;
pub mod files;
pub mod intake;
pub mod io;
pub mod merge;
pub mod output;
pub mod session;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PdfMasterError, Result};
pub use session::MergeSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
