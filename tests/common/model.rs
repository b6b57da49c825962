//! Scripted language model.

use async_trait::async_trait;
use autospotify::agent::llm::{
    CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message, ToolCall,
};
use autospotify::agent::tools::ToolDefinition;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every request.
pub struct ScriptedModel {
    responses: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
    offered_tools: Mutex<Vec<Vec<String>>>,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            offered_tools: Mutex::new(Vec::new()),
        }
    }

    /// Queue a turn requesting a single tool call.
    pub fn then_call(self, name: &str, arguments: serde_json::Value) -> Self {
        let id = format!("call_{}", self.responses.lock().unwrap().len());
        self.then(Ok(CompletionResponse::tool_calls(vec![ToolCall::new(
            id, name, arguments,
        )])))
    }

    /// Queue a final text answer.
    pub fn then_text(self, text: &str) -> Self {
        self.then(Ok(CompletionResponse::text(text)))
    }

    pub fn then(self, response: Result<CompletionResponse, LlmError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn offered_tools(&self) -> Vec<Vec<String>> {
        self.offered_tools.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.offered_tools.lock().unwrap().push(
            tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
        );
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}
