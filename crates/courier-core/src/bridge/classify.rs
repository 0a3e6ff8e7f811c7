//! Event classification
//!
//! Maps one engine event to zero or more output events, either discrete
//! status notifications or incremental content fragments, against the small
//! amount of state one turn carries. Status rules run before content extraction so
//! transfer and tool updates appear ahead of any text from the same event.

use crate::runner::EngineEvent;

/// Author string the engine uses for the initiating user echo.
const USER_AUTHOR: &str = "user";

/// A normalized event on the turn's output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Transient indicator of in-progress work, shown only before content
    /// streams.
    Status(String),
    /// Fragment of the authoritative, user-visible answer.
    Content(String),
}

/// Mutable state carried across one turn's classifier calls.
///
/// Exclusively owned by one turn's orchestrator. `content_started` latches
/// permanently once the first content fragment is emitted; it is never reset
/// for the remainder of the turn.
#[derive(Debug, Default)]
pub struct TurnState {
    active_agent: Option<String>,
    content_started: bool,
}

impl TurnState {
    /// Fresh state for a new turn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the turn has started streaming answer content.
    pub fn content_started(&self) -> bool {
        self.content_started
    }

    /// Last non-user author observed this turn.
    pub fn active_agent(&self) -> Option<&str> {
        self.active_agent.as_deref()
    }
}

/// Classify one engine event into ordered output events.
///
/// Once content has started, every status rule is permanently inert for the
/// rest of the turn, even if a later event reports further tool calls or
/// transfers. The agent tracker still updates, so the suppression is purely
/// about what reaches the user.
pub fn classify_event(event: &EngineEvent, state: &mut TurnState) -> Vec<OutputEvent> {
    // The initiating user echo is the input being processed, not the response.
    if event.author.as_deref() == Some(USER_AUTHOR) {
        return Vec::new();
    }

    let mut outputs = Vec::new();

    // Explicit handoff; independent of the tracked active agent.
    if let Some(target) = event.transfer_target.as_deref() {
        if !target.is_empty() && !state.content_started {
            outputs.push(OutputEvent::Status(format!("Consulting {}...", target)));
        }
    }

    // Agent change. The tracker updates even while statuses are suppressed.
    if let Some(author) = event.author.as_deref() {
        if !author.is_empty() && state.active_agent.as_deref() != Some(author) {
            state.active_agent = Some(author.to_string());
            if !state.content_started {
                outputs.push(OutputEvent::Status(format!("{} is working...", author)));
            }
        }
    }

    // Tool invocations.
    if !state.content_started {
        for call in &event.tool_invocations {
            outputs.push(OutputEvent::Status(format!(
                "Using {}...",
                humanize_tool_name(&call.name)
            )));
        }
    }

    // Content extraction; never suppressed, only status is.
    for part in &event.content {
        if let Some(text) = part.text.as_deref() {
            if !text.is_empty() {
                state.content_started = true;
                outputs.push(OutputEvent::Content(text.to_string()));
            }
        }
    }

    outputs
}

/// Make a tool identifier readable: separators become spaces and each word is
/// capitalized (`format_text` → `Format Text`).
pub fn humanize_tool_name(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
