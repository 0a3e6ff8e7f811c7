//! Turn output stream
//!
//! Normalizes one turn's engine events into a pull-consumable stream of
//! output events. The engine stream is pumped by a spawned task; classified
//! outputs arrive over a bounded channel in strict arrival order.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cancel::TurnCancellation;
use super::classify::{classify_event, OutputEvent, TurnState};
use super::error::BridgeError;
use crate::runner::{AgentRunner, RunnerError};

/// Buffered outputs between the pump task and the consumer.
const OUTPUT_BUFFER: usize = 32;

/// One turn's normalized output stream.
#[derive(Debug)]
pub struct TurnStream {
    rx: mpsc::Receiver<Result<OutputEvent, BridgeError>>,
    pump: JoinHandle<()>,
}

impl TurnStream {
    /// Ensure the runner session and start streaming one turn.
    ///
    /// "Already exists" from session creation is tolerated; any other session
    /// failure aborts before an engine event is pulled. A mid-stream engine
    /// error surfaces as a single terminal `Err` item.
    pub async fn open(
        runner: Arc<dyn AgentRunner>,
        identity: &str,
        session_key: &str,
        message: &str,
        cancellation: TurnCancellation,
    ) -> Result<Self, BridgeError> {
        match runner.ensure_session(identity, session_key).await {
            Ok(()) => {}
            Err(RunnerError::SessionExists(key)) => {
                debug!("Session already exists: {}", key);
            }
            Err(e) => return Err(BridgeError::Session(e)),
        }

        let mut events = runner
            .stream_turn(identity, session_key, message)
            .await
            .map_err(BridgeError::Stream)?;

        let (tx, rx) = mpsc::channel(OUTPUT_BUFFER);
        let pump = tokio::spawn(async move {
            let mut state = TurnState::new();
            let mut event_count = 0usize;

            while let Some(item) = events.next().await {
                if cancellation.is_cancelled() {
                    info!("Turn cancelled after {} events, stopping pump", event_count);
                    return;
                }
                event_count += 1;
                match item {
                    Ok(event) => {
                        for output in classify_event(&event, &mut state) {
                            if tx.send(Ok(output)).await.is_err() {
                                // Consumer went away.
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Engine stream error at event #{}: {}", event_count, e);
                        let _ = tx.send(Err(BridgeError::Stream(e))).await;
                        return;
                    }
                }
            }
            debug!("Engine stream ended after {} events", event_count);
        });

        Ok(Self { rx, pump })
    }

    /// Next output event; `None` when the turn's stream is exhausted.
    pub async fn next(&mut self) -> Option<Result<OutputEvent, BridgeError>> {
        self.rx.recv().await
    }
}

impl Drop for TurnStream {
    fn drop(&mut self) {
        // The pump may still be blocked on an unbounded engine stream.
        self.pump.abort();
    }
}
