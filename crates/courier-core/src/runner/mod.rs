//! Agent runner boundary
//!
//! The runner executes a hierarchy of reasoning agents and tools and emits a
//! live event stream per turn. This module defines the interface Courier
//! consumes; the hierarchy itself and the tools agents call are a black box.
//! All durable conversation history lives in the runner's own session store,
//! keyed by `(identity, session_key)`.

mod events;

pub use events::{ContentPart, EngineEvent, ToolInvocation};

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

/// Errors surfaced by the agent runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Session already exists for this identity/key pair
    #[error("session already exists: {0}")]
    SessionExists(String),

    /// Session creation failed
    #[error("session setup failed: {0}")]
    Session(String),

    /// Transport or engine failure while streaming events
    #[error("engine stream failed: {0}")]
    Stream(String),

    /// Event payload did not match the expected shape
    #[error("invalid engine event: {0}")]
    InvalidEvent(String),
}

/// Live event stream for one turn.
///
/// Terminates normally when the engine has no more events, or yields a single
/// terminal error on transport/engine failure.
pub type EngineEventStream = Pin<Box<dyn Stream<Item = Result<EngineEvent, RunnerError>> + Send>>;

/// Interface to the external agent runner.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Ensure a session exists for `(identity, session_key)`.
    ///
    /// Returning [`RunnerError::SessionExists`] is not a failure; callers
    /// tolerate it and proceed with the existing session.
    async fn ensure_session(&self, identity: &str, session_key: &str) -> Result<(), RunnerError>;

    /// Start one turn and return the engine's live event stream.
    ///
    /// `message` is the newest user input only; the runner's session holds
    /// the rest of the history.
    async fn stream_turn(
        &self,
        identity: &str,
        session_key: &str,
        message: &str,
    ) -> Result<EngineEventStream, RunnerError>;
}
