//! Single-request tool-calling loop.

use super::extract::{extract_recommendations, ExtractionStatus};
use super::prompt::SYSTEM_PREAMBLE;
use super::state::{Exchange, ExchangeState};
use crate::agent::llm::{CompletionOptions, LlmError, LlmProvider, Message};
use crate::agent::tools::{AgentToolRegistry, ToolError};
use crate::agent::trace::{ToolInvocationRecord, TraceTable};
use crate::music::{MusicServiceError, RecommendedTrack};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_ROUNDS: usize = 8;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Model exchange failed: {0}")]
    ModelExchange(#[from] LlmError),

    #[error(transparent)]
    Service(#[from] MusicServiceError),
}

/// Outcome of one user request.
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    pub tracks: Vec<RecommendedTrack>,
    pub trace: Vec<ToolInvocationRecord>,
    /// The model's final text.
    pub reply: String,
    pub status: ExtractionStatus,
}

impl RecommendationResult {
    pub fn trace_table(&self) -> TraceTable {
        TraceTable::from_trace(&self.trace)
    }
}

/// Drives the model through zero or more tool calls for one user text.
///
/// Holds no per-request state; concurrent `run` calls are independent.
pub struct Orchestrator {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<AgentToolRegistry>,
    max_rounds: usize,
    completion_options: CompletionOptions,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Arc<AgentToolRegistry>) -> Self {
        Self {
            llm,
            tools,
            max_rounds: DEFAULT_MAX_ROUNDS,
            completion_options: CompletionOptions::default(),
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_completion_options(mut self, options: CompletionOptions) -> Self {
        self.completion_options = options;
        self
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    pub async fn run(&self, user_text: &str) -> Result<RecommendationResult, OrchestratorError> {
        info!(
            provider = self.llm.name(),
            model = self.llm.model(),
            "Handling request"
        );
        let mut exchange = Exchange::new(SYSTEM_PREAMBLE, user_text);

        while !exchange.state.is_terminal() {
            self.step(&mut exchange).await?;
        }

        let reply = match exchange.state {
            ExchangeState::Completed { reply } => reply,
            _ => String::new(),
        };
        let trace = exchange.trace.into_records();
        let (tracks, status) = extract_recommendations(&trace);
        info!(
            tracks = tracks.len(),
            trace_len = trace.len(),
            status = ?status,
            "Request finished"
        );

        Ok(RecommendationResult {
            tracks,
            trace,
            reply,
            status,
        })
    }

    async fn step(&self, exchange: &mut Exchange) -> Result<(), OrchestratorError> {
        match &exchange.state {
            ExchangeState::Thinking => {
                if exchange.rounds >= self.max_rounds {
                    warn!(
                        max_rounds = self.max_rounds,
                        "Tool exchange hit the round limit, extracting what we have"
                    );
                    exchange.state = ExchangeState::Completed {
                        reply: exchange.last_assistant_text(),
                    };
                    return Ok(());
                }
                exchange.rounds += 1;

                let tool_defs = self.tools.definitions();
                let tools = if tool_defs.is_empty() {
                    None
                } else {
                    Some(tool_defs.as_slice())
                };

                let response = tokio::time::timeout(
                    self.completion_options.timeout,
                    self.llm
                        .complete(&exchange.messages, tools, &self.completion_options),
                )
                .await
                .map_err(|_| LlmError::Timeout)??;

                debug!(
                    round = exchange.rounds,
                    finish_reason = ?response.finish_reason,
                    tool_calls = response.message.requested_tool_calls().len(),
                    "Model responded"
                );

                let tool_calls = response.message.requested_tool_calls().to_vec();
                let content = response.message.content.clone();
                exchange.messages.push(response.message);

                exchange.state = if tool_calls.is_empty() {
                    ExchangeState::Completed { reply: content }
                } else {
                    ExchangeState::ExecutingTools { tool_calls }
                };
            }

            ExchangeState::ExecutingTools { tool_calls } => {
                let tool_calls = tool_calls.clone();

                for tool_call in tool_calls {
                    exchange
                        .trace
                        .record_call(&tool_call.name, tool_call.arguments.clone());

                    let payload = match self
                        .tools
                        .execute(&tool_call.name, tool_call.arguments.clone())
                        .await
                    {
                        Ok(value) => value,
                        Err(ToolError::Service(err)) => {
                            warn!(tool = %tool_call.name, error = %err, "Tool failed, aborting request");
                            return Err(err.into());
                        }
                        Err(err) => {
                            warn!(tool = %tool_call.name, error = %err, "Reporting tool error to the model");
                            json!({ "error": err.to_string() })
                        }
                    };

                    exchange
                        .trace
                        .record_response(&tool_call.name, payload.clone());
                    exchange.messages.push(Message::tool_response(
                        &tool_call.id,
                        &tool_call.name,
                        payload.to_string(),
                    ));
                }

                exchange.state = ExchangeState::Thinking;
            }

            ExchangeState::Completed { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::{CompletionResponse, ToolCall};
    use crate::agent::tools::{AgentTool, ToolDefinition};
    use crate::agent::trace::InvocationKind;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned responses and records the conversations it was sent.
    struct ScriptedModel {
        responses: Mutex<VecDeque<CompletionResponse>>,
        seen: Mutex<Vec<Vec<Message>>>,
        delay: Option<Duration>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<CompletionResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(
            &self,
            messages: &[Message],
            _tools: Option<&[ToolDefinition]>,
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, LlmError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.seen.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
        }

        async fn health_check(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    struct FixedRecommend;

    #[async_trait]
    impl AgentTool for FixedRecommend {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::no_params("recommend", "test")
        }

        async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
            match args.get("artist_names") {
                Some(_) => Err(MusicServiceError::Lookup("catalog down".to_string()).into()),
                None => Ok(json!({"result": [{"name": "Song", "artist": "Band", "id": "t1"}]})),
            }
        }
    }

    fn orchestrator(model: Arc<ScriptedModel>) -> Orchestrator {
        let mut registry = AgentToolRegistry::new();
        registry.register(FixedRecommend);
        Orchestrator::new(model, Arc::new(registry))
    }

    fn call(id: &str, name: &str, args: serde_json::Value) -> CompletionResponse {
        CompletionResponse::tool_calls(vec![ToolCall::new(id, name, args)])
    }

    #[tokio::test]
    async fn test_text_answer_without_tools() {
        let model = Arc::new(ScriptedModel::new(vec![CompletionResponse::text("Hello!")]));
        let result = orchestrator(model.clone()).run("hello").await.unwrap();

        assert!(result.tracks.is_empty());
        assert!(result.trace.is_empty());
        assert_eq!(result.reply, "Hello!");
        assert_eq!(result.status, ExtractionStatus::NoRecommendation);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0][0].content, SYSTEM_PREAMBLE);
        assert_eq!(seen[0][1].content, "hello");
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let model = Arc::new(ScriptedModel::new(vec![
            call("c1", "recommend", json!({"limit": 1})),
            CompletionResponse::text("Here you go"),
        ]));
        let result = orchestrator(model.clone()).run("something upbeat").await.unwrap();

        assert_eq!(result.status, ExtractionStatus::Found);
        assert_eq!(result.tracks, vec![RecommendedTrack::new("Song", "Band", "t1")]);
        assert_eq!(result.trace.len(), 2);
        assert_eq!(result.trace[0].kind, InvocationKind::Call);
        assert_eq!(result.trace[0].payload, json!({"limit": 1}));
        assert_eq!(result.trace[1].kind, InvocationKind::Response);
        assert_eq!(result.trace_table().rows().len(), 2);

        // The tool output was fed back with the call id.
        let seen = model.seen.lock().unwrap();
        let tool_message = seen[1].last().unwrap();
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("c1"));
        assert!(tool_message.content.contains("\"t1\""));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let model = Arc::new(ScriptedModel::new(vec![
            call("c1", "play_music", json!({})),
            CompletionResponse::text("Sorry"),
        ]));
        let result = orchestrator(model).run("play something").await.unwrap();

        assert_eq!(result.trace.len(), 2);
        assert!(result.trace[1].payload["error"]
            .as_str()
            .unwrap()
            .contains("play_music"));
        assert_eq!(result.status, ExtractionStatus::NoRecommendation);
    }

    #[tokio::test]
    async fn test_service_error_aborts() {
        let model = Arc::new(ScriptedModel::new(vec![
            call("c1", "recommend", json!({"artist_names": ["Kygo"]})),
            CompletionResponse::text("unreachable"),
        ]));
        let err = orchestrator(model).run("like Kygo").await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Service(MusicServiceError::Lookup(_))
        ));
    }

    #[tokio::test]
    async fn test_round_limit_proceeds_to_extraction() {
        let model = Arc::new(ScriptedModel::new(vec![
            call("c1", "recommend", json!({})),
            call("c2", "recommend", json!({})),
            call("c3", "recommend", json!({})),
        ]));
        let result = orchestrator(model.clone())
            .with_max_rounds(2)
            .run("loop forever")
            .await
            .unwrap();

        assert_eq!(model.seen.lock().unwrap().len(), 2);
        assert_eq!(result.trace.len(), 4);
        assert_eq!(result.status, ExtractionStatus::Found);
        assert_eq!(result.tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_model_timeout() {
        let mut model = ScriptedModel::new(vec![CompletionResponse::text("late")]);
        model.delay = Some(Duration::from_millis(200));
        let options = CompletionOptions {
            timeout: Duration::from_millis(20),
            ..CompletionOptions::default()
        };

        let err = orchestrator(Arc::new(model))
            .with_completion_options(options)
            .run("hi")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::ModelExchange(LlmError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let err = orchestrator(model).run("hi").await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::ModelExchange(LlmError::InvalidResponse(_))
        ));
    }
}
