//! Request and response types for a single completion round trip.

use serde::Serialize;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";
/// Default output token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Default nucleus sampling parameter.
pub const DEFAULT_TOP_P: f32 = 1.0;

/// A single role/content message pair.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: text.into(),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One completion request, constructed fresh per call.
///
/// `max_tokens` is the canonical name for the output token limit; the
/// provider-specific wire name is applied at the transport boundary.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

/// The model's reply. Produced only on a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
}
