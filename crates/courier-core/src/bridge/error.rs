//! Bridge error taxonomy
//!
//! Only the turn orchestrator decides fatality: the classifier and throttler
//! never raise, and a failed status update merely drops the status.

use thiserror::Error;

use crate::channel::ChannelError;
use crate::runner::RunnerError;

/// Errors that abort a conversational turn.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Session creation failed for a reason other than "already exists"
    #[error("session error: {0}")]
    Session(#[source] RunnerError),

    /// The engine's event stream failed mid-iteration; already-streamed
    /// content stays visible
    #[error("stream error: {0}")]
    Stream(#[source] RunnerError),

    /// A content-sink call on the presentation channel failed
    #[error("presentation error: {0}")]
    Presentation(#[from] ChannelError),

    /// The turn was abandoned by the caller
    #[error("turn cancelled")]
    Cancelled,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        BridgeError::Internal(err.to_string())
    }
}
