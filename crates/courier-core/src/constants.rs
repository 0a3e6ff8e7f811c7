//! Pipeline constants and configuration defaults
//!
//! Centralized location for user-visible status phrases and throttling defaults.

use std::time::Duration;

/// Status indicator configuration
pub mod status {
    use super::*;

    /// Coarse label sent with every status forward. The presentation surface
    /// may rewrite it to one of its own predefined phrases.
    pub const WORKING_LABEL: &str = "is working...";

    /// Detail issued before the first engine event arrives, so the indicator
    /// is never empty during connection latency.
    pub const THINKING_DETAIL: &str = "is thinking...";

    /// Minimum interval between forwarded status updates within one turn
    pub const MIN_INTERVAL: Duration = Duration::from_millis(500);

    /// Ceiling on forwarded status updates per conversation per window
    pub const MAX_PER_WINDOW: u32 = 60;

    /// Width of the per-conversation rate-ceiling window
    pub const WINDOW: Duration = Duration::from_secs(60);
}

/// Thread greeting configuration
pub mod greeting {
    /// Message posted when a new assistant thread opens
    pub const THREAD_GREETING: &str = "How can I help you?";
}
