//! Exchange state definitions.

use crate::agent::llm::{Message, ToolCall};
use crate::agent::trace::TraceRecorder;

/// Where a single request's exchange with the model stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeState {
    /// Waiting for the model's next turn.
    Thinking,

    /// The model requested tool calls.
    ExecutingTools { tool_calls: Vec<ToolCall> },

    /// The model answered with text, or the round bound was reached.
    Completed { reply: String },
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Completed { .. })
    }
}

/// Mutable state of one request. Lives only for the duration of `run`.
pub(crate) struct Exchange {
    pub state: ExchangeState,
    pub messages: Vec<Message>,
    pub trace: TraceRecorder,
    /// Model round-trips made so far.
    pub rounds: usize,
}

impl Exchange {
    pub fn new(system_prompt: &str, user_text: &str) -> Self {
        Self {
            state: ExchangeState::Thinking,
            messages: vec![Message::system(system_prompt), Message::user(user_text)],
            trace: TraceRecorder::new(),
            rounds: 0,
        }
    }

    /// Text of the most recent assistant turn, empty when there is none.
    pub fn last_assistant_text(&self) -> String {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::agent::llm::MessageRole::Assistant)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}
