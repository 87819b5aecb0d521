//! Completion-service collaborator abstraction.
//!
//! The agent orchestrator sends one chat-style request per agent invocation
//! and receives raw completion text back. Timeouts are the implementation's
//! responsibility; the orchestrator waits as long as the call takes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model.
    System,
    /// The request content.
    User,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Target model identifier.
    pub model: String,
    /// Conversation, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; agents use a low value.
    pub temperature: f32,
}

/// External language-model completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the completion text for `request`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Completion` if the service call fails.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
