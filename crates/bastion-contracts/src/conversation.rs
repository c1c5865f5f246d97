//! Conversation input types.
//!
//! These are what the caller (an API layer, the CLI) hands to the
//! coordinator. The pipeline never mutates them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BastionError;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation history.
///
/// Ordering is significant: the planner reads the most recent `user` turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// A message authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// A message authored by the assistant.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// How the pipeline is being invoked.
///
/// Accepted on every run but not branched on; reserved for a future
/// `simulate` pipeline that runs without side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Assist,
    Simulate,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Assist => "assist",
            Mode::Simulate => "simulate",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BastionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assist" => Ok(Mode::Assist),
            "simulate" => Ok(Mode::Simulate),
            _ => Err(BastionError::InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

/// The full input record for one conversation turn.
///
/// `conversation_id` identifies a prior run the caller wants to continue. The
/// core is stateless across calls and never reads it; it exists so the
/// request can round-trip through the caller's persistence layer intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl ConversationRequest {
    /// A request in `assist` mode with no scenario or prior conversation.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            mode: Mode::default(),
            scenario_id: None,
            conversation_id: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_scenario(mut self, scenario_id: impl Into<String>) -> Self {
        self.scenario_id = Some(scenario_id.into());
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}
