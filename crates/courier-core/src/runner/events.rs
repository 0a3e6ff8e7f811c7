//! Engine event boundary types
//!
//! The agent runner emits loosely-typed events: a duck-typed bag of optional
//! attributes. They are validated exactly once here, so everything downstream
//! matches on a closed, fully-typed structure instead of probing for attribute
//! presence at each use site.

use serde::Deserialize;
use serde_json::Value;

use super::RunnerError;

/// One event from the agent runner's live stream.
///
/// A single event may simultaneously carry a transfer indication, tool
/// invocations, and content parts; consumers must handle all three facets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineEvent {
    /// Originating author: `"user"`, an agent name, or a tool pseudo-author.
    pub author: Option<String>,
    /// Ordered content parts; empty when the event carries no content.
    pub content: Vec<ContentPart>,
    /// Tool calls requested by this event.
    pub tool_invocations: Vec<ToolInvocation>,
    /// Explicit handoff to another agent.
    pub transfer_target: Option<String>,
    /// True when this event is a mid-stream fragment of a larger response.
    pub is_partial: bool,
}

/// A single content fragment within an event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentPart {
    /// Text of this fragment, when present.
    pub text: Option<String>,
}

/// A tool call carried by an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// Tool identifier as the engine knows it (e.g. `get_current_time`).
    pub name: String,
    /// Arguments the engine passed to the tool.
    #[serde(default)]
    pub arguments: Value,
}

impl EngineEvent {
    /// Validate a raw engine payload into a typed event.
    ///
    /// This is the only place the duck-typed payload is probed.
    pub fn from_value(value: Value) -> Result<Self, RunnerError> {
        serde_json::from_value(value).map_err(|e| RunnerError::InvalidEvent(e.to_string()))
    }
}
