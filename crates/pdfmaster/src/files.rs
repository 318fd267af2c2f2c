//! Uploaded files and the ordered file list.
//!
//! The position of an entry in [`FileList`] is its merge position. Entries
//! are never edited in place: reordering swaps positions, removal filters
//! the list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{PdfMasterError, Result};

/// MIME type declared by PDF handles.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// MIME type declared by anything that is not recognised as a PDF.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Opaque unique identifier assigned to a file on intake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where the bytes of a [`FileHandle`] live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Content is read from disk when the merge needs it.
    Path(PathBuf),
    /// Content is already in memory.
    Memory(Arc<[u8]>),
}

/// A raw file handle: name, size, declared type and a content source.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    size: u64,
    mime_type: String,
    source: FileSource,
}

impl FileHandle {
    /// Build a handle for a file on disk.
    ///
    /// The declared type comes from the extension, the way a browser fills
    /// in `File.type`; the content is not sniffed.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a regular file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfMasterError::file_not_found(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        if !metadata.is_file() {
            return Err(PdfMasterError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: mime_type_for_name(&name).to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Build a handle over bytes already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes),
        }
    }

    /// File name, without directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes as reported at intake.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Content source.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// True if the declared type is the PDF MIME type.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }

    /// Read the full content.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMasterError::FailedToRead`] if the file cannot be read.
    pub async fn read_all(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| PdfMasterError::FailedToRead {
                        name: self.name.clone(),
                        source,
                    })
            }
        }
    }
}

/// Declared MIME type for a file name.
pub fn mime_type_for_name(name: &str) -> &'static str {
    let is_pdf = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf { PDF_MIME_TYPE } else { FALLBACK_MIME_TYPE }
}

/// A file accepted into the session.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Identifier assigned on intake.
    pub id: FileId,
    /// The underlying handle.
    pub file: FileHandle,
    /// Optional preview reference (never produced by the merge view).
    pub preview: Option<String>,
}

impl UploadedFile {
    /// Wrap a handle with a freshly generated identifier.
    pub fn new(file: FileHandle) -> Self {
        Self {
            id: FileId::new(),
            file,
            preview: None,
        }
    }

    /// Serializable view of this entry.
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            id: self.id.clone(),
            name: self.file.name.clone(),
            size: self.file.size,
            mime_type: self.file.mime_type.clone(),
        }
    }
}

/// Serializable description of an [`UploadedFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    /// Identifier.
    pub id: FileId,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub mime_type: String,
}

/// Direction of an adjacent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0 ("left" in the grid).
    TowardStart,
    /// Toward the last index ("right" in the grid).
    TowardEnd,
}

/// Ordered list of uploaded files. Order is merge order.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    entries: Vec<UploadedFile>,
}

impl FileList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries after the existing ones, keeping their order.
    pub fn append(&mut self, files: impl IntoIterator<Item = UploadedFile>) {
        self.entries.extend(files);
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &FileId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        self.entries.len() != before
    }

    /// Swap the entry at `index` with its neighbour in `direction`.
    ///
    /// Requests whose source or target index falls outside the list are
    /// ignored. Returns whether the list changed.
    pub fn move_file(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::TowardStart => index.checked_sub(1),
            Direction::TowardEnd => index.checked_add(1),
        };

        match target {
            Some(target) if index < self.entries.len() && target < self.entries.len() => {
                self.entries.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&UploadedFile> {
        self.entries.get(index)
    }

    /// Iterate in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, UploadedFile> {
        self.entries.iter()
    }

    /// Entries in merge order.
    pub fn as_slice(&self) -> &[UploadedFile] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a UploadedFile;
    type IntoIter = std::slice::Iter<'a, UploadedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
