//! Call/response trace of a request and its tabular report.

mod record;
mod report;

pub use record::{InvocationKind, ToolInvocationRecord, TraceRecorder};
pub use report::{TraceRow, TraceTable, TRACE_HEADERS};
