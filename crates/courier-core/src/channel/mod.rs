//! Presentation channel boundary
//!
//! The chat surface Courier presents into. It offers a transient status
//! indicator, a live appendable message for the streamed answer, and one-off
//! messages for greetings and failure notices. Transport, authentication, and
//! message formatting live behind the trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the presentation channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A status indicator update failed
    #[error("status update failed: {0}")]
    Status(String),

    /// A live-message operation (begin/append/finalize) failed
    #[error("message stream failed: {0}")]
    Message(String),

    /// The channel transport itself failed
    #[error("channel transport failed: {0}")]
    Transport(String),
}

/// Key addressing one conversation on the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    /// Channel (or room) identifier.
    pub channel_id: String,
    /// Thread identifier within the channel.
    pub thread_key: String,
}

impl ConversationKey {
    /// Create a conversation key.
    pub fn new(channel_id: impl Into<String>, thread_key: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            thread_key: thread_key.into(),
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel_id, self.thread_key)
    }
}

/// Opaque handle to a live, appendable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(String);

impl MessageHandle {
    /// Wrap a channel-assigned message identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Terminal decoration attached when a live message is finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDecorations {
    /// Attach feedback controls (thumbs up/down) to the finished message.
    pub feedback_controls: bool,
}

impl MessageDecorations {
    /// Standard decoration for a completed answer.
    pub fn feedback() -> Self {
        Self {
            feedback_controls: true,
        }
    }
}

/// A prompt suggestion offered when a thread opens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedPrompt {
    /// Short label shown to the user.
    pub title: String,
    /// Full message sent when the suggestion is picked.
    pub message: String,
}

impl SuggestedPrompt {
    /// Create a suggested prompt.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Interface to the external presentation surface.
#[async_trait]
pub trait PresentationChannel: Send + Sync {
    /// Update the conversation's status indicator.
    ///
    /// `status` is a coarse label the surface may rewrite to one of its own
    /// phrases; `detail` is shown verbatim. An empty `detail` clears the
    /// indicator.
    async fn set_status(
        &self,
        conversation: &ConversationKey,
        status: &str,
        detail: &str,
    ) -> Result<(), ChannelError>;

    /// Open a live message that content fragments can be appended to.
    async fn begin_message(
        &self,
        conversation: &ConversationKey,
    ) -> Result<MessageHandle, ChannelError>;

    /// Append a fragment to a live message.
    async fn append_content(
        &self,
        handle: &MessageHandle,
        fragment: &str,
    ) -> Result<(), ChannelError>;

    /// Mark a live message complete and attach terminal decoration.
    ///
    /// No further appends are valid for the handle afterwards.
    async fn finalize_content(
        &self,
        handle: &MessageHandle,
        decorations: &MessageDecorations,
    ) -> Result<(), ChannelError>;

    /// Post a standalone message to the conversation.
    async fn post_message(
        &self,
        conversation: &ConversationKey,
        text: &str,
    ) -> Result<(), ChannelError>;

    /// Post the user-visible notice for an unrecoverable turn failure.
    async fn post_failure_notice(
        &self,
        conversation: &ConversationKey,
        error_text: &str,
    ) -> Result<(), ChannelError>;

    /// Install suggested prompts for a freshly opened thread.
    async fn set_suggested_prompts(
        &self,
        conversation: &ConversationKey,
        prompts: &[SuggestedPrompt],
    ) -> Result<(), ChannelError>;
}
