//! Courier Core - agent-to-chat conversion layer
//!
//! This crate converts the live event stream of a hierarchical multi-agent
//! runner (a root coordinator delegating to specialized sub-agents, each
//! optionally invoking tools) into the two channels a chat surface
//! understands:
//! - Status notifications driving a real-time "typing/working" indicator
//! - Content fragments streamed into a live answer message
//!
//! The agent runner and the chat surface are external collaborators behind
//! traits; this crate is a pure stream-transformation and presentation layer
//! between them.

pub mod bridge;
pub mod channel;
pub mod constants;
pub mod runner;

// Re-exports for convenience
pub use bridge::{
    classify_event, greet_thread, humanize_tool_name, BridgeError, ChatMessage, ChatRole,
    OutputEvent, StatusRateLimits, ThrottleConfig, TurnCancellation, TurnOrchestrator,
    TurnOutcome, TurnRequest, TurnState, TurnStream,
};
pub use channel::{
    ChannelError, ConversationKey, MessageDecorations, MessageHandle, PresentationChannel,
    SuggestedPrompt,
};
pub use runner::{AgentRunner, ContentPart, EngineEvent, EngineEventStream, RunnerError, ToolInvocation};
