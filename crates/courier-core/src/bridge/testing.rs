//! Test doubles for the external collaborators.
//!
//! A recording presentation channel and a scripted agent runner, shared by the
//! bridge module tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::channel::{
    ChannelError, ConversationKey, MessageDecorations, MessageHandle, PresentationChannel,
    SuggestedPrompt,
};
use crate::runner::{AgentRunner, ContentPart, EngineEvent, EngineEventStream, RunnerError};

/// Record of one presentation-channel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Status { status: String, detail: String },
    Begin,
    Append { fragment: String },
    Finalize { feedback: bool },
    Post { text: String },
    FailureNotice { text: String },
    Prompts { titles: Vec<String> },
}

/// Presentation channel that records every call.
#[derive(Default)]
pub struct RecordingChannel {
    calls: Mutex<Vec<ChannelCall>>,
    fail_status: AtomicBool,
    fail_appends: AtomicBool,
    next_message: AtomicUsize,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set_status` call fail.
    pub fn fail_status(&self) {
        self.fail_status.store(true, Ordering::SeqCst);
    }

    /// Make every `append_content` call fail.
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap().clone()
    }

    /// All `(status, detail)` pairs passed to `set_status`, in order.
    pub fn statuses(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Status { status, detail } => Some((status, detail)),
                _ => None,
            })
            .collect()
    }

    /// All appended fragments, in order.
    pub fn appended(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Append { fragment } => Some(fragment),
                _ => None,
            })
            .collect()
    }

    /// All failure notices, in order.
    pub fn failure_notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::FailureNotice { text } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Number of clear calls (`set_status` with empty detail).
    pub fn clear_count(&self) -> usize {
        self.statuses()
            .iter()
            .filter(|(_, detail)| detail.is_empty())
            .count()
    }

    pub fn finalize_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ChannelCall::Finalize { .. }))
            .count()
    }

    fn record(&self, call: ChannelCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PresentationChannel for RecordingChannel {
    async fn set_status(
        &self,
        _conversation: &ConversationKey,
        status: &str,
        detail: &str,
    ) -> Result<(), ChannelError> {
        self.record(ChannelCall::Status {
            status: status.to_string(),
            detail: detail.to_string(),
        });
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ChannelError::Status("status backend down".into()));
        }
        Ok(())
    }

    async fn begin_message(
        &self,
        _conversation: &ConversationKey,
    ) -> Result<MessageHandle, ChannelError> {
        self.record(ChannelCall::Begin);
        let id = self.next_message.fetch_add(1, Ordering::SeqCst);
        Ok(MessageHandle::new(format!("m{}", id)))
    }

    async fn append_content(
        &self,
        _handle: &MessageHandle,
        fragment: &str,
    ) -> Result<(), ChannelError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(ChannelError::Message("append rejected".into()));
        }
        self.record(ChannelCall::Append {
            fragment: fragment.to_string(),
        });
        Ok(())
    }

    async fn finalize_content(
        &self,
        _handle: &MessageHandle,
        decorations: &MessageDecorations,
    ) -> Result<(), ChannelError> {
        self.record(ChannelCall::Finalize {
            feedback: decorations.feedback_controls,
        });
        Ok(())
    }

    async fn post_message(
        &self,
        _conversation: &ConversationKey,
        text: &str,
    ) -> Result<(), ChannelError> {
        self.record(ChannelCall::Post {
            text: text.to_string(),
        });
        Ok(())
    }

    async fn post_failure_notice(
        &self,
        _conversation: &ConversationKey,
        error_text: &str,
    ) -> Result<(), ChannelError> {
        self.record(ChannelCall::FailureNotice {
            text: error_text.to_string(),
        });
        Ok(())
    }

    async fn set_suggested_prompts(
        &self,
        _conversation: &ConversationKey,
        prompts: &[SuggestedPrompt],
    ) -> Result<(), ChannelError> {
        self.record(ChannelCall::Prompts {
            titles: prompts.iter().map(|p| p.title.clone()).collect(),
        });
        Ok(())
    }
}

/// How the stub runner answers `ensure_session`.
#[derive(Debug, Clone, Copy)]
pub enum EnsureBehavior {
    Succeed,
    AlreadyExists,
    Fail,
}

/// Agent runner that plays back a canned event script.
pub struct StubRunner {
    events: Mutex<Option<Vec<Result<EngineEvent, RunnerError>>>>,
    ensure: EnsureBehavior,
    fail_stream: bool,
}

impl StubRunner {
    pub fn new(events: Vec<Result<EngineEvent, RunnerError>>) -> Self {
        Self {
            events: Mutex::new(Some(events)),
            ensure: EnsureBehavior::Succeed,
            fail_stream: false,
        }
    }

    pub fn with_ensure(mut self, behavior: EnsureBehavior) -> Self {
        self.ensure = behavior;
        self
    }

    /// Make `stream_turn` itself fail before any event is produced.
    pub fn with_failing_stream(mut self) -> Self {
        self.fail_stream = true;
        self
    }
}

#[async_trait]
impl AgentRunner for StubRunner {
    async fn ensure_session(&self, identity: &str, session_key: &str) -> Result<(), RunnerError> {
        match self.ensure {
            EnsureBehavior::Succeed => Ok(()),
            EnsureBehavior::AlreadyExists => Err(RunnerError::SessionExists(format!(
                "{}/{}",
                identity, session_key
            ))),
            EnsureBehavior::Fail => Err(RunnerError::Session("session store unreachable".into())),
        }
    }

    async fn stream_turn(
        &self,
        _identity: &str,
        _session_key: &str,
        _message: &str,
    ) -> Result<EngineEventStream, RunnerError> {
        if self.fail_stream {
            return Err(RunnerError::Stream("engine unavailable".into()));
        }
        let events = self.events.lock().unwrap().take().unwrap_or_default();
        Ok(Box::pin(tokio_stream::iter(events)))
    }
}

/// Event with only an author set.
pub fn agent_event(author: &str) -> EngineEvent {
    EngineEvent {
        author: Some(author.to_string()),
        ..Default::default()
    }
}

/// Event carrying one content fragment.
pub fn content_event(author: &str, text: &str) -> EngineEvent {
    EngineEvent {
        author: Some(author.to_string()),
        content: vec![ContentPart {
            text: Some(text.to_string()),
        }],
        ..Default::default()
    }
}
