//! Merge session.
//!
//! [`MergeSession`] owns the ordered file list, the processing status and
//! the active view, and routes finished merges to a [`DownloadSink`]. Every
//! user action of the merge tool maps to one method here.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmaster::download::DirectorySink;
//! use pdfmaster::intake::{IntakeSource, handles_from_patterns};
//! use pdfmaster::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new(DirectorySink::new("."));
//! session.add_files(IntakeSource::Picker, handles_from_patterns(["a.pdf", "b.pdf"])?)?;
//! let report = session.merge().await?;
//! println!("wrote {}", report.delivered.filename);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::time::Duration;

use crate::download::{Delivered, Download, DownloadSink};
use crate::error::{PdfMasterError, Result};
use crate::files::{Direction, FileHandle, FileId, FileList, FileSummary};
use crate::intake::{IntakeSource, accept_files};
use crate::merge::{MIN_FILES, MergeStatistics, Merger};
use crate::state::{Phase, ProcessingState, ViewMode};

/// Inline message for a merge requested with too few files.
pub const VALIDATION_ERROR_MESSAGE: &str = "Please select at least 2 PDF files to merge.";

/// Status message while a merge is running.
pub const PROCESSING_MESSAGE: &str = "Merging your documents...";

/// User-facing message for any failure during processing.
pub const PROCESSING_ERROR_MESSAGE: &str =
    "An error occurred while processing your PDF. Please try again.";

/// Question asked before clearing the list.
pub const RESET_PROMPT: &str = "Are you sure you want to clear all files?";

/// Default pause before merging, so the processing status is observable.
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_millis(800);

/// Yes/no confirmation gate.
pub trait Confirm {
    /// Ask `prompt`; true means the user agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause awaited after entering the processing phase.
    pub processing_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// What the sink received.
    pub delivered: Delivered,
    /// Merge statistics.
    pub statistics: MergeStatistics,
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Files in merge order.
    pub files: Vec<FileSummary>,
    /// Processing status.
    pub status: ProcessingState,
    /// Derived phase.
    pub phase: Phase,
    /// Active view.
    pub view_mode: ViewMode,
}

impl SessionSnapshot {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PdfMasterError::other(format!("Failed to serialize session: {e}")))
    }
}

/// State container for one merge tool session.
#[derive(Debug)]
pub struct MergeSession<S> {
    files: FileList,
    state: ProcessingState,
    view_mode: ViewMode,
    config: SessionConfig,
    merger: Merger,
    sink: S,
}

impl<S: DownloadSink> MergeSession<S> {
    /// Session delivering to `sink` with default settings.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SessionConfig::default())
    }

    /// Session delivering to `sink` with `config`.
    pub fn with_config(sink: S, config: SessionConfig) -> Self {
        Self {
            files: FileList::new(),
            state: ProcessingState::idle(),
            view_mode: ViewMode::default(),
            config,
            merger: Merger::new(),
            sink,
        }
    }

    /// Files in merge order.
    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// Current processing status.
    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Active view.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// The download sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Add handles from `source` after the existing files.
    ///
    /// Returns how many were accepted. When nothing is accepted the session
    /// is left exactly as it was, pending error included.
    ///
    /// # Errors
    ///
    /// [`PdfMasterError::SessionBusy`] while merging,
    /// [`PdfMasterError::SplitUnavailable`] in the split view.
    pub fn add_files(
        &mut self,
        source: IntakeSource,
        handles: impl IntoIterator<Item = FileHandle>,
    ) -> Result<usize> {
        self.ensure_idle()?;
        self.ensure_merge_view()?;

        let accepted = accept_files(source, handles);
        if accepted.is_empty() {
            return Ok(0);
        }

        let count = accepted.len();
        self.files.append(accepted);
        self.state.clear_error();

        tracing::debug!(added = count, total = self.files.len(), ?source, "files added");
        Ok(count)
    }

    /// Remove the file with `id`. Returns false if it was not in the list.
    ///
    /// # Errors
    ///
    /// [`PdfMasterError::SessionBusy`] while merging.
    pub fn remove(&mut self, id: &FileId) -> Result<bool> {
        self.ensure_idle()?;
        Ok(self.files.remove(id))
    }

    /// Swap the file at `index` with its neighbour in `direction`.
    /// Returns false when the move falls outside the list.
    ///
    /// # Errors
    ///
    /// [`PdfMasterError::SessionBusy`] while merging.
    pub fn move_file(&mut self, index: usize, direction: Direction) -> Result<bool> {
        self.ensure_idle()?;
        Ok(self.files.move_file(index, direction))
    }

    /// Merge the current list and hand the result to the sink.
    ///
    /// With fewer than two files the validation message is set and nothing
    /// else happens. Otherwise the session enters the processing phase,
    /// waits the configured delay, merges, delivers, and returns to idle.
    /// Any failure on the way leaves the generic processing message set;
    /// the raw error is logged and returned.
    ///
    /// The list is kept after a successful merge. Dropping the returned
    /// future before it completes puts the session back to idle.
    ///
    /// # Errors
    ///
    /// - [`PdfMasterError::SessionBusy`] or [`PdfMasterError::SplitUnavailable`]
    ///   without any state change
    /// - [`PdfMasterError::NotEnoughFiles`] for the validation failure
    /// - the underlying read, parse, merge or delivery error
    pub async fn merge(&mut self) -> Result<MergeReport> {
        self.ensure_idle()?;
        self.ensure_merge_view()?;

        if !self.has_enough_files() {
            self.state = ProcessingState {
                error: Some(VALIDATION_ERROR_MESSAGE.to_string()),
                ..self.state.clone()
            };
            return Err(PdfMasterError::not_enough_files(self.files.len()));
        }

        let guard = ProcessingGuard::enter(&mut self.state);

        if !self.config.processing_delay.is_zero() {
            tokio::time::sleep(self.config.processing_delay).await;
        }

        let result = run_merge(&self.merger, &self.files, &self.sink).await;
        match result {
            Ok(report) => {
                guard.finish(ProcessingState::idle());
                Ok(report)
            }
            Err(err) => {
                tracing::error!(error = %err, "merge failed");
                guard.finish(ProcessingState::failed(PROCESSING_ERROR_MESSAGE));
                Err(err)
            }
        }
    }

    /// Whether [`merge`](Self::merge) would start processing right now,
    /// i.e. pass the busy, view and file-count checks.
    pub fn ready_to_merge(&self) -> bool {
        !self.state.is_processing && self.view_mode == ViewMode::Merge && self.has_enough_files()
    }

    fn has_enough_files(&self) -> bool {
        self.files.len() >= MIN_FILES
    }

    /// Clear the list and status if `confirm` agrees to [`RESET_PROMPT`].
    /// Returns whether the reset happened.
    pub fn reset(&mut self, confirm: &impl Confirm) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            return false;
        }

        self.files.clear();
        self.state = ProcessingState::idle();
        true
    }

    /// Switch the active view. The list and status are kept.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Serializable snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            files: self.files.iter().map(|f| f.summary()).collect(),
            status: self.state.clone(),
            phase: self.state.phase(),
            view_mode: self.view_mode,
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state.is_processing {
            return Err(PdfMasterError::SessionBusy);
        }
        Ok(())
    }

    fn ensure_merge_view(&self) -> Result<()> {
        if self.view_mode == ViewMode::Split {
            return Err(PdfMasterError::SplitUnavailable);
        }
        Ok(())
    }
}

async fn run_merge<S: DownloadSink>(
    merger: &Merger,
    files: &FileList,
    sink: &S,
) -> Result<MergeReport> {
    let output = merger.merge(files.as_slice()).await?;
    let delivered = sink.deliver(Download::new(output.bytes)).await?;

    Ok(MergeReport {
        delivered,
        statistics: output.statistics,
    })
}

/// Holds the session in the processing phase for the lifetime of a merge.
///
/// If the merge future is dropped before [`finish`](Self::finish), the
/// session goes back to idle instead of staying busy.
struct ProcessingGuard<'a> {
    state: &'a mut ProcessingState,
    finished: bool,
}

impl<'a> ProcessingGuard<'a> {
    fn enter(state: &'a mut ProcessingState) -> Self {
        *state = ProcessingState::processing(PROCESSING_MESSAGE);
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, next: ProcessingState) {
        *self.state = next;
        self.finished = true;
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("merge abandoned before completion");
            *self.state = ProcessingState::idle();
        }
    }
}
