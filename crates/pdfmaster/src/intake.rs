//! File intake.
//!
//! Turns raw handles from a drop payload or a file picker into
//! [`UploadedFile`] entries. Drops are filtered by declared MIME type;
//! picker selections are taken as-is.

use std::path::Path;

use crate::error::Result;
use crate::files::{FileHandle, UploadedFile};
use crate::utils::collect_paths_for_patterns;

/// Where a batch of handles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeSource {
    /// Drag-and-drop payload. Only PDF handles are accepted.
    Drop,
    /// Native file picker. Every selected handle is accepted.
    #[default]
    Picker,
}

impl IntakeSource {
    /// Whether this source keeps `handle`.
    pub fn accepts(&self, handle: &FileHandle) -> bool {
        match self {
            Self::Drop => handle.is_pdf(),
            Self::Picker => true,
        }
    }
}

/// Filter `handles` for `source` and wrap each survivor with a fresh id.
///
/// Order of the input is preserved.
pub fn accept_files(
    source: IntakeSource,
    handles: impl IntoIterator<Item = FileHandle>,
) -> Vec<UploadedFile> {
    handles
        .into_iter()
        .filter(|handle| {
            let keep = source.accepts(handle);
            if !keep {
                tracing::debug!(
                    name = handle.name(),
                    mime_type = handle.mime_type(),
                    "dropped handle is not a PDF, skipping"
                );
            }
            keep
        })
        .map(UploadedFile::new)
        .collect()
}

/// Resolve path patterns into file handles.
///
/// Glob patterns are expanded; every resulting path must be an existing
/// regular file.
///
/// # Errors
///
/// Returns the first missing path or non-file encountered. Nothing is
/// returned partially.
pub fn handles_from_patterns<T>(patterns: T) -> Result<Vec<FileHandle>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    collect_paths_for_patterns(patterns)?
        .iter()
        .map(FileHandle::from_path)
        .collect()
}

/// Build handles for already-resolved paths.
///
/// # Errors
///
/// Returns the first missing path or non-file encountered.
pub fn handles_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FileHandle>> {
    paths.iter().map(FileHandle::from_path).collect()
}
