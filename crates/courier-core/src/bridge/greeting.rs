//! Thread-start greeting
//!
//! When a new assistant thread opens, the surface greets the user and offers
//! suggested prompts before any turn runs.

use tracing::debug;

use super::error::BridgeError;
use crate::channel::{ConversationKey, PresentationChannel, SuggestedPrompt};
use crate::constants::greeting;

/// Default prompt suggestions for a fresh thread.
pub fn default_suggested_prompts() -> Vec<SuggestedPrompt> {
    vec![
        SuggestedPrompt::new(
            "Summarize this channel",
            "Can you summarize the recent discussion in this channel and pull out any action items?",
        ),
        SuggestedPrompt::new(
            "Write a draft announcement",
            "Can you write a draft announcement about a new feature my team just released? \
             It must include how impactful it is.",
        ),
        SuggestedPrompt::new(
            "Plan my priorities",
            "Can you help me organize my open tasks and plan priorities and action items for this week?",
        ),
    ]
}

/// Greet a freshly opened thread and install suggested prompts.
pub async fn greet_thread(
    channel: &dyn PresentationChannel,
    conversation: &ConversationKey,
) -> Result<(), BridgeError> {
    channel
        .post_message(conversation, greeting::THREAD_GREETING)
        .await?;
    channel
        .set_suggested_prompts(conversation, &default_suggested_prompts())
        .await?;
    debug!("Thread greeting posted for {}", conversation);
    Ok(())
}
