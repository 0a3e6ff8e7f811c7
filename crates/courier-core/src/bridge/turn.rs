//! Turn orchestration
//!
//! Drives one end-to-end conversational turn: ensures the runner session,
//! feeds the latest user message into the engine, pulls the normalized output
//! stream, and routes statuses to the throttled indicator and content to the
//! live message. Every turn finalizes or fails exactly once.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::cancel::TurnCancellation;
use super::classify::OutputEvent;
use super::error::BridgeError;
use super::stream::TurnStream;
use super::throttle::{
    spawn_status_worker, StatusRateLimits, StatusSignal, StatusThrottler, ThrottleConfig,
};
use crate::channel::{ConversationKey, MessageDecorations, MessageHandle, PresentationChannel};
use crate::constants::status;
use crate::runner::AgentRunner;

/// Role of one prior conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior conversation entry.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Input for one turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Caller identity in the runner's session store.
    pub identity: String,
    /// Session key in the runner's session store (e.g. the thread id).
    pub session_key: String,
    /// Conversation to present into.
    pub conversation: ConversationKey,
    /// Prior messages, oldest first. Only the last entry goes to the engine;
    /// the runner's session already holds the rest.
    pub messages: Vec<ChatMessage>,
}

/// What a completed turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Whether any answer content streamed to the surface.
    pub content_streamed: bool,
}

/// Orchestrates turns between the agent runner and the presentation channel.
///
/// One instance may serve many conversations. Each `run_turn` call owns its
/// turn state exclusively; turns for distinct conversations are fully
/// independent, sharing only the per-conversation status rate windows.
pub struct TurnOrchestrator {
    runner: Arc<dyn AgentRunner>,
    channel: Arc<dyn PresentationChannel>,
    limits: Arc<StatusRateLimits>,
    config: ThrottleConfig,
}

impl TurnOrchestrator {
    /// Create an orchestrator with default throttling.
    pub fn new(runner: Arc<dyn AgentRunner>, channel: Arc<dyn PresentationChannel>) -> Self {
        Self::with_config(runner, channel, ThrottleConfig::default())
    }

    /// Create an orchestrator with custom throttling.
    pub fn with_config(
        runner: Arc<dyn AgentRunner>,
        channel: Arc<dyn PresentationChannel>,
        config: ThrottleConfig,
    ) -> Self {
        Self {
            runner,
            channel,
            limits: Arc::new(StatusRateLimits::new()),
            config,
        }
    }

    /// Run one turn to completion.
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnOutcome, BridgeError> {
        self.run_turn_with_cancellation(request, TurnCancellation::new())
            .await
    }

    /// Run one turn with an externally held cancellation flag.
    pub async fn run_turn_with_cancellation(
        &self,
        request: TurnRequest,
        cancellation: TurnCancellation,
    ) -> Result<TurnOutcome, BridgeError> {
        debug!("Starting turn for {}", request.conversation);

        let throttler = StatusThrottler::new(
            request.conversation.clone(),
            self.limits.clone(),
            self.config.clone(),
        );
        let (status_tx, status_worker) =
            spawn_status_worker(self.channel.clone(), request.conversation.clone(), throttler);

        // The indicator must never be empty during connection latency.
        let _ = status_tx
            .send(StatusSignal::Update(status::THINKING_DETAIL.to_string()))
            .await;

        let result = self
            .stream_turn(&request, cancellation, &status_tx)
            .await;

        // Clear the indicator on every exit path, then let the worker drain.
        let _ = status_tx.send(StatusSignal::Clear).await;
        drop(status_tx);
        let _ = status_worker.await;

        match result {
            Ok(outcome) => {
                debug!(
                    "Turn finished for {} (content_streamed: {})",
                    request.conversation, outcome.content_streamed
                );
                Ok(outcome)
            }
            // Abandoned by the caller: nothing to tell the user.
            Err(BridgeError::Cancelled) => Err(BridgeError::Cancelled),
            Err(error) => {
                warn!("Turn failed for {}: {}", request.conversation, error);
                self.post_failure(&request.conversation, &error).await;
                Err(error)
            }
        }
    }

    async fn stream_turn(
        &self,
        request: &TurnRequest,
        cancellation: TurnCancellation,
        status_tx: &mpsc::Sender<StatusSignal>,
    ) -> Result<TurnOutcome, BridgeError> {
        // The engine only needs the newest user input.
        let message = request
            .messages
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or_default();

        let mut outputs = TurnStream::open(
            self.runner.clone(),
            &request.identity,
            &request.session_key,
            message,
            cancellation.clone(),
        )
        .await?;

        let mut handle: Option<MessageHandle> = None;

        while let Some(item) = outputs.next().await {
            if cancellation.is_cancelled() {
                break;
            }
            match item? {
                OutputEvent::Status(text) => {
                    // The worker applies throttling; a send failure only means
                    // the worker is gone and the status is dropped.
                    let _ = status_tx.send(StatusSignal::Update(text)).await;
                }
                OutputEvent::Content(fragment) => {
                    // The live message opens lazily on the first fragment, so
                    // a turn that fails earlier leaves no empty message behind.
                    if handle.is_none() {
                        handle = Some(self.channel.begin_message(&request.conversation).await?);
                    }
                    if let Some(h) = &handle {
                        self.channel.append_content(h, &fragment).await?;
                    }
                }
            }
        }

        if cancellation.is_cancelled() {
            // Close out a message that already started so the surface is not
            // left holding an open live message; never open one now.
            if let Some(h) = &handle {
                if let Err(e) = self
                    .channel
                    .finalize_content(h, &MessageDecorations::feedback())
                    .await
                {
                    warn!("Failed to finalize cancelled turn message: {}", e);
                }
            }
            return Err(BridgeError::Cancelled);
        }

        if let Some(h) = &handle {
            self.channel
                .finalize_content(h, &MessageDecorations::feedback())
                .await?;
        }

        Ok(TurnOutcome {
            content_streamed: handle.is_some(),
        })
    }

    /// Exactly one user-visible notice per failed turn. Content already
    /// streamed stays on the surface; the notice lands after it.
    async fn post_failure(&self, conversation: &ConversationKey, error: &BridgeError) {
        let text = format!("Something went wrong! ({})", error);
        if let Err(e) = self.channel.post_failure_notice(conversation, &text).await {
            warn!("Failed to post failure notice for {}: {}", conversation, e);
        }
    }
}
