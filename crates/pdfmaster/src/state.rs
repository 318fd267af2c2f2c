//! Processing status and view mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PdfMasterError;

/// Observable phase derived from a [`ProcessingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing running, no error pending.
    Idle,
    /// A merge is in flight.
    Processing,
    /// Idle with an error pending.
    Error,
}

/// Status of the session: idle, processing, or idle with an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingState {
    /// True while a merge is in flight.
    pub is_processing: bool,
    /// Progress message shown while processing.
    pub message: String,
    /// Pending user-facing error.
    pub error: Option<String>,
}

impl ProcessingState {
    /// Idle, no message, no error.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Processing with `message`, error cleared.
    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            is_processing: true,
            message: message.into(),
            error: None,
        }
    }

    /// Idle with `error` pending.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            is_processing: false,
            message: String::new(),
            error: Some(error.into()),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.is_processing {
            Phase::Processing
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    /// Drop a pending error, leaving the rest untouched.
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Which tool view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Merge multiple documents.
    #[default]
    Merge,
    /// Placeholder; not implemented.
    Split,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Split => f.write_str("split"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = PdfMasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "split" => Ok(Self::Split),
            _ => Err(PdfMasterError::invalid_config(format!(
                "Invalid view mode: {s}. Must be one of: merge, split"
            ))),
        }
    }
}
