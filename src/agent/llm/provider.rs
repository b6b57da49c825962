//! LLM provider trait definition.

use super::types::{CompletionResponse, Message};
use crate::agent::tools::ToolDefinition;
use crate::config::{DEFAULT_MODEL_TIMEOUT_SEC, DEFAULT_TEMPERATURE};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Per-request sampling settings and the round-trip bound.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    /// Upper bound for one model round-trip, enforced by the orchestrator
    /// and passed down to HTTP providers.
    pub timeout: Duration,
}

impl CompletionOptions {
    pub fn new(temperature: f32, timeout: Duration) -> Self {
        Self {
            temperature,
            timeout,
        }
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::new(
            DEFAULT_TEMPERATURE,
            Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SEC),
        )
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend refused the API key.
    #[error("Model backend rejected credentials (status {0})")]
    Unauthorized(u16),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

impl LlmError {
    /// Classify a non-success HTTP status from a model backend.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => LlmError::Unauthorized(status),
            429 => LlmError::RateLimited,
            _ => LlmError::Api {
                status,
                message: message.into(),
            },
        }
    }
}

/// A chat model that can call tools.
///
/// The orchestrator only talks to this trait, so any backend speaking a
/// tool-calling chat protocol (or a scripted fake in tests) can drive it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Complete a conversation, optionally offering tools.
    ///
    /// The returned message either carries tool calls or a final answer.
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}
