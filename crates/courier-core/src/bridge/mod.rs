//! Event conversion core
//!
//! Converts the live event stream of a hierarchical multi-agent runner into a
//! normalized two-channel output (discrete status notifications and
//! incremental content fragments) and drives one conversational turn end to
//! end against the presentation surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ EngineEvent ┌─────────────┐ OutputEvent ┌──────────────┐
//! │ Agent Runner │────────────►│ TurnStream  │────────────►│ Orchestrator │
//! │  (external)  │             │ (classifier)│             └──────┬───────┘
//! └──────────────┘             └─────────────┘           Status   │  Content
//!                                                     ┌───────────┤
//!                                               ┌─────▼─────┐ ┌───▼────────┐
//!                                               │ Throttler │ │ Live       │
//!                                               │  worker   │ │ message    │
//!                                               └───────────┘ └────────────┘
//! ```
//!
//! One turn owns its state exclusively; turns for distinct conversations run
//! fully independently. The only cross-turn state is the per-conversation
//! status rate window.

mod cancel;
mod classify;
mod error;
mod greeting;
mod stream;
mod throttle;
mod turn;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::TurnCancellation;
pub use classify::{classify_event, humanize_tool_name, OutputEvent, TurnState};
pub use error::BridgeError;
pub use greeting::{default_suggested_prompts, greet_thread};
pub use stream::TurnStream;
pub use throttle::{
    spawn_status_worker, StatusRateLimits, StatusSignal, StatusThrottler, ThrottleConfig,
};
pub use turn::{ChatMessage, ChatRole, TurnOrchestrator, TurnOutcome, TurnRequest};
