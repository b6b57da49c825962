//! Language-model agent.
//!
//! - `llm`: provider trait and the OpenAI-compatible client
//! - `tools`: tools exposed to the model and their registry
//! - `trace`: call/response records and the trace table
//! - `orchestrator`: the per-request tool-calling loop

pub mod llm;
pub mod orchestrator;
pub mod tools;
pub mod trace;

pub use llm::{CompletionOptions, LlmError, LlmProvider, OpenAiCompatProvider};
pub use orchestrator::{
    ExtractionStatus, Orchestrator, OrchestratorError, RecommendationResult, DEFAULT_MAX_ROUNDS,
};
pub use tools::{music_tools, AgentToolRegistry};
pub use trace::{InvocationKind, ToolInvocationRecord, TraceTable};
