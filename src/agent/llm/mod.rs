//! LLM provider abstraction layer.
//!
//! The orchestrator depends on the `LlmProvider` trait only; the
//! OpenAI-compatible implementation is what the binary wires in.

mod openai;
mod provider;
mod types;

pub use openai::{OpenAiCompatProvider, DEFAULT_MODEL, GEMINI_OPENAI_BASE_URL};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage, ToolCall};
