//! Reduces a conversation to the run's investigation goal.

use bastion_contracts::conversation::{Message, Role};

/// Goal used when the conversation holds no user message.
pub const FALLBACK_GOAL: &str = "Investigate suspicious activity.";

/// Return the content of the most recent `user` message, or `FALLBACK_GOAL`.
///
/// Total over any input, including an empty slice.
pub fn decompose(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_else(|| FALLBACK_GOAL.to_string())
}
