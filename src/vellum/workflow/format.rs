// SPDX-License-Identifier: MIT

//! Display formatting helpers for the rendering layer and the CLI

use serde::Serialize;
use serde_json::Value;

/// Default row cap for [`summarize_for_display`]
pub const SUMMARY_MAX_ITEMS: usize = 6;

const SUMMARY_VALUE_MAX_CHARS: usize = 120;

/// One display row of a summarized payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    pub value: String,
}

/// Human-readable duration: `"n/a"` when unknown, `500ms`, `1.5s`,
/// `1m 1s`.
pub fn format_duration_ms(ms: Option<i64>) -> String {
    let Some(ms) = ms else {
        return "n/a".to_string();
    };
    if ms < 1000 {
        return format!("{}ms", ms);
    }
    if ms < 60_000 {
        return format!("{:.1}s", ms as f64 / 1000.0);
    }
    let total_seconds = ms / 1000;
    format!("{}m {}s", total_seconds / 60, total_seconds % 60)
}

/// Summarize an arbitrary payload object as up to `max_items` key/value
/// rows: arrays by count, nested objects by field count, scalars
/// stringified and truncated. Non-objects yield no rows. Pure and total.
pub fn summarize_for_display(value: &Value, max_items: usize) -> Vec<SummaryRow> {
    let Some(fields) = value.as_object() else {
        return Vec::new();
    };
    fields
        .iter()
        .take(max_items)
        .map(|(key, field)| SummaryRow {
            key: key.clone(),
            value: summarize_value(field),
        })
        .collect()
}

fn summarize_value(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("{} items", items.len()),
        Value::Object(fields) => format!("{} fields", fields.len()),
        Value::String(s) => truncate(s),
        other => truncate(&other.to_string()),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= SUMMARY_VALUE_MAX_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(SUMMARY_VALUE_MAX_CHARS).collect();
    out.push('…');
    out
}
