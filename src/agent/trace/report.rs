//! Tabular view of a trace.

use super::record::ToolInvocationRecord;
use std::fmt;
use unicode_width::UnicodeWidthStr;

pub const TRACE_HEADERS: [&str; 3] = ["kind", "tool", "payload"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRow {
    pub kind: String,
    pub tool: String,
    /// Compact JSON.
    pub payload: String,
}

/// One row per record, in trace order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceTable {
    rows: Vec<TraceRow>,
}

impl TraceTable {
    pub fn from_trace(trace: &[ToolInvocationRecord]) -> Self {
        let rows = trace
            .iter()
            .map(|record| TraceRow {
                kind: record.kind.to_string(),
                tool: record.tool_name.clone(),
                payload: record.payload.to_string(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> [usize; 3] {
        let mut widths = TRACE_HEADERS.map(|h| h.width());
        for row in &self.rows {
            widths[0] = widths[0].max(row.kind.width());
            widths[1] = widths[1].max(row.tool.width());
            widths[2] = widths[2].max(row.payload.width());
        }
        widths
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: [&str; 3], widths: &[usize; 3]) -> fmt::Result {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        line.push_str(cell);
        if i < cells.len() - 1 {
            line.push_str(&" ".repeat(widths[i].saturating_sub(cell.width())));
        }
    }
    writeln!(f, "{}", line)
}

impl fmt::Display for TraceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        write_line(f, TRACE_HEADERS, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &self.rows {
            write_line(f, [&row.kind, &row.tool, &row.payload], &widths)?;
        }
        Ok(())
    }
}
