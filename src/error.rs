//! Error taxonomy for the wire codec and the search engine.
//!
//! These never cross the wire as structured data: the coordinator flattens a [`SearchError`]
//! into a two-field [`SearchResponse`](crate::SearchResponse) before anything is written.

use std::io;
use std::path::PathBuf;

/// Codec-level failure. The connection the bytes came from must be discarded.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("i/o error while reading frame: {0}")]
    Io(#[from] io::Error),
}

impl FrameError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        FrameError::Malformed(msg.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FrameError::Malformed(_))
    }
}

/// Failure of a single search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// User input error: surfaced verbatim (with the attempted path) in the error payload.
    #[error("Specified root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The root exists but could not be listed. Only the operator log sees the cause.
    #[error("cannot read root directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Anything unexpected, including a panic on the search path.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Text safe to put on the wire. Only `RootNotFound` carries detail.
    pub fn wire_message(&self) -> String {
        match self {
            SearchError::RootNotFound(_) => self.to_string(),
            SearchError::Io { .. } => "Failed to read root directory".to_string(),
            SearchError::Internal(_) => "Internal error".to_string(),
        }
    }
}
