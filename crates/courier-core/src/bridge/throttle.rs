//! Status throttling
//!
//! Rate-limits and deduplicates outgoing status notifications before they
//! reach the presentation channel. Coalesces rather than queues: a newer
//! status replaces a not-yet-sent pending one, so the channel never receives
//! a backlog of stale statuses. A missed or dropped status is cosmetic and
//! never fails the turn.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::channel::{ConversationKey, PresentationChannel};
use crate::constants::status;

/// Buffered signals between the orchestrator and the status worker.
const SIGNAL_BUFFER: usize = 16;

/// Throttling policy for one turn's status updates.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum interval between forwarded statuses within a turn.
    pub min_interval: Duration,
    /// Forwarded-update ceiling per conversation per window.
    pub max_per_window: u32,
    /// Width of the rate-ceiling window.
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: status::MIN_INTERVAL,
            max_per_window: status::MAX_PER_WINDOW,
            window: status::WINDOW,
        }
    }
}

/// Per-conversation rate windows.
///
/// Shared across the sequential turns of each conversation; this is the only
/// throttling state that outlives a turn. Protects the external presentation
/// API independently of the per-turn interval.
#[derive(Debug, Default)]
pub struct StatusRateLimits {
    windows: DashMap<ConversationKey, RateWindow>,
}

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started: Instant,
    forwarded: u32,
}

impl StatusRateLimits {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a forward attempt; false when the conversation's ceiling is hit.
    fn try_acquire(
        &self,
        conversation: &ConversationKey,
        config: &ThrottleConfig,
        now: Instant,
    ) -> bool {
        let mut entry = self
            .windows
            .entry(conversation.clone())
            .or_insert(RateWindow {
                started: now,
                forwarded: 0,
            });

        if now.duration_since(entry.started) >= config.window {
            entry.started = now;
            entry.forwarded = 0;
        }
        if entry.forwarded >= config.max_per_window {
            return false;
        }
        entry.forwarded += 1;
        true
    }
}

/// Decision core for one turn's status stream.
///
/// Time is passed in explicitly, which keeps the policy testable without a
/// clock. The worker below is the only production caller.
pub struct StatusThrottler {
    config: ThrottleConfig,
    conversation: ConversationKey,
    limits: Arc<StatusRateLimits>,
    last_forwarded: Option<String>,
    last_forward_at: Option<Instant>,
    pending: Option<String>,
}

impl StatusThrottler {
    /// Create a throttler for one turn of `conversation`.
    pub fn new(
        conversation: ConversationKey,
        limits: Arc<StatusRateLimits>,
        config: ThrottleConfig,
    ) -> Self {
        Self {
            config,
            conversation,
            limits,
            last_forwarded: None,
            last_forward_at: None,
            pending: None,
        }
    }

    /// Offer a new status at `now`. Returns the text to forward immediately;
    /// otherwise the status replaced the pending slot or was dropped.
    fn offer_at(&mut self, text: String, now: Instant) -> Option<String> {
        if let Some(at) = self.last_forward_at {
            if now.duration_since(at) < self.config.min_interval {
                // Coalesce: replace, never queue.
                self.pending = Some(text);
                return None;
            }
        }
        self.commit(text, now)
    }

    /// Deadline at which the pending status becomes due, if one is pending.
    fn flush_deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_forward_at.map(|at| at + self.config.min_interval)
    }

    /// Take the pending status once its deadline has passed.
    fn take_due(&mut self, now: Instant) -> Option<String> {
        let deadline = self.flush_deadline()?;
        if now < deadline {
            return None;
        }
        let text = self.pending.take()?;
        self.commit(text, now)
    }

    /// Drop any pending status. Used by the immediate clear path.
    fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Forward gate: dedup and the per-conversation ceiling.
    fn commit(&mut self, text: String, now: Instant) -> Option<String> {
        if self.last_forwarded.as_deref() == Some(text.as_str()) {
            debug!("Dropping duplicate status for {}: {}", self.conversation, text);
            return None;
        }
        if !self.limits.try_acquire(&self.conversation, &self.config, now) {
            debug!(
                "Status ceiling hit for {}, dropping: {}",
                self.conversation, text
            );
            return None;
        }
        self.last_forward_at = Some(now);
        self.last_forwarded = Some(text.clone());
        Some(text)
    }
}

/// Signal into the status worker.
#[derive(Debug)]
pub enum StatusSignal {
    /// New status text from the classifier.
    Update(String),
    /// Clear the indicator now, bypassing coalescing.
    Clear,
}

/// Spawn the status worker for one turn.
///
/// The worker owns the throttler and is the turn's only caller of
/// `set_status`. Each forward issues exactly one call with the coarse working
/// label and the status text as verbatim detail; failures are logged and
/// ignored. The worker exits when the sender side closes.
pub fn spawn_status_worker(
    channel: Arc<dyn PresentationChannel>,
    conversation: ConversationKey,
    mut throttler: StatusThrottler,
) -> (mpsc::Sender<StatusSignal>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel(SIGNAL_BUFFER);

    let handle = tokio::spawn(async move {
        loop {
            let signal = match throttler.flush_deadline() {
                Some(deadline) => {
                    tokio::select! {
                        signal = rx.recv() => signal,
                        _ = tokio::time::sleep_until(deadline) => {
                            if let Some(text) = throttler.take_due(Instant::now()) {
                                forward(channel.as_ref(), &conversation, &text).await;
                            }
                            continue;
                        }
                    }
                }
                None => rx.recv().await,
            };

            match signal {
                Some(StatusSignal::Update(text)) => {
                    if let Some(text) = throttler.offer_at(text, Instant::now()) {
                        forward(channel.as_ref(), &conversation, &text).await;
                    }
                }
                Some(StatusSignal::Clear) => {
                    throttler.discard_pending();
                    if let Err(e) = channel.set_status(&conversation, "", "").await {
                        warn!("Failed to clear status for {}: {}", conversation, e);
                    }
                }
                None => break,
            }
        }
        debug!("Status worker for {} finished", conversation);
    });

    (tx, handle)
}

async fn forward(channel: &dyn PresentationChannel, conversation: &ConversationKey, detail: &str) {
    debug!("Setting status for {}: {}", conversation, detail);
    if let Err(e) = channel
        .set_status(conversation, status::WORKING_LABEL, detail)
        .await
    {
        // A missed status update is cosmetic.
        warn!("Failed to set status for {}: {}", conversation, e);
    }
}
