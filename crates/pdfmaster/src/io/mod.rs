//! I/O operations for pdfmaster.
//!
//! This module handles:
//! - Reading uploaded files and parsing them into documents
//! - Serializing documents into byte buffers
//! - Writing buffers to disk atomically

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteStatistics};
