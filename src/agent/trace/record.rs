//! Tool invocation records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Whether a record is the model's request or the tool's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationKind {
    Call,
    Response,
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationKind::Call => write!(f, "call"),
            InvocationKind::Response => write!(f, "response"),
        }
    }
}

/// One entry of a request's call/response trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRecord {
    /// Position within the trace (0-indexed).
    pub step_number: u32,
    /// Unix timestamp (milliseconds).
    pub timestamp: i64,
    pub kind: InvocationKind,
    pub tool_name: String,
    /// Arguments for a call, tool output (or error payload) for a response.
    pub payload: serde_json::Value,
    /// Time spent in the tool, responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl ToolInvocationRecord {
    pub fn new(
        step_number: u32,
        kind: InvocationKind,
        tool_name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            step_number,
            timestamp: chrono::Utc::now().timestamp_millis(),
            kind,
            tool_name: tool_name.into(),
            payload,
            duration_ms: None,
        }
    }

    pub fn is_response_from(&self, tool_name: &str) -> bool {
        self.kind == InvocationKind::Response && self.tool_name == tool_name
    }
}

/// Accumulates the trace of a single request.
///
/// A call starts the timer; the matching response records the elapsed time.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    records: Vec<ToolInvocationRecord>,
    current_timer: Option<Instant>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&mut self, tool_name: &str, arguments: serde_json::Value) {
        let record = ToolInvocationRecord::new(
            self.next_step(),
            InvocationKind::Call,
            tool_name,
            arguments,
        );
        self.records.push(record);
        self.current_timer = Some(Instant::now());
    }

    pub fn record_response(&mut self, tool_name: &str, payload: serde_json::Value) {
        let mut record = ToolInvocationRecord::new(
            self.next_step(),
            InvocationKind::Response,
            tool_name,
            payload,
        );
        if let Some(start) = self.current_timer.take() {
            record.duration_ms = Some(start.elapsed().as_millis() as i64);
        }
        self.records.push(record);
    }

    pub fn records(&self) -> &[ToolInvocationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ToolInvocationRecord> {
        self.records
    }

    fn next_step(&self) -> u32 {
        self.records.len() as u32
    }
}
