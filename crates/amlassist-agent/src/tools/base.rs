//! Tool trait — the interface every model-invokable action implements.
//!
//! `execute` returns a plain `String`: failures are rendered as text starting
//! with [`ERROR_MARKER`] so one failing call never aborts a turn.

use async_trait::async_trait;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use amlassist_core::types::ToolDefinition;
use amlassist_core::utils::truncate_string;

/// Prefix of every failed tool result.
pub const ERROR_MARKER: &str = "Error:";

/// Longest backend error body echoed back to the model.
const MAX_ERROR_BODY_CHARS: usize = 300;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used by the model to call this tool.
    fn name(&self) -> &str;

    /// Description the model reads to decide when to call the tool.
    fn description(&self) -> &str;

    /// JSON Schema of the parameters: `{"type": "object", "properties": …}`.
    fn parameters(&self) -> Value;

    /// Run the tool. Never fails; errors come back as `"Error: …"` text.
    async fn execute(&self, params: HashMap<String, Value>) -> String;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────

/// Why a tool call failed. Rendered to text, never propagated.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response from backend: {0}")]
    Malformed(String),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

impl ToolError {
    /// Build a `Status` error, preferring the backend's own message field.
    pub fn status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|k| v.get(*k).and_then(Value::as_str).map(String::from))
            })
            .unwrap_or_else(|| truncate_string(body.trim(), MAX_ERROR_BODY_CHARS));
        let message = if message.is_empty() {
            "(empty body)".to_string()
        } else {
            message
        };
        ToolError::Status { status, message }
    }

    /// The text handed back to the model.
    pub fn render(&self) -> String {
        format!("{ERROR_MARKER} {self}")
    }
}

// ─────────────────────────────────────────────
// Input parsing
// ─────────────────────────────────────────────

/// Deserialize model-supplied parameters into a typed input.
///
/// Unknown enum values, wrong types and missing required fields are
/// rejected here, before any request is made.
pub fn parse_input<T: DeserializeOwned>(params: HashMap<String, Value>) -> Result<T, ToolError> {
    let object: serde_json::Map<String, Value> = params.into_iter().collect();
    serde_json::from_value(Value::Object(object)).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

// ─────────────────────────────────────────────
// Backend record fields
// ─────────────────────────────────────────────

/// Reads a string or number field as text; `null` and other shapes read as absent.
pub fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Reads a non-negative count sent as a number or numeric string; anything
/// else reads as absent.
pub fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(count.and_then(|n| T::try_from(n).ok()))
}

/// Reads a required identifier sent as a string or a number.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected a string or number id, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Input {
        confirm: bool,
        #[serde(default)]
        note: Option<String>,
    }

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_input_ok() {
        let input: Input = parse_input(params(json!({"confirm": true}))).unwrap();
        assert!(input.confirm);
        assert!(input.note.is_none());
    }

    #[test]
    fn test_parse_input_missing_field() {
        let err = parse_input::<Input>(HashMap::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
        assert!(err.render().starts_with("Error: invalid input"));
        assert!(err.to_string().contains("confirm"));
    }

    #[test]
    fn test_parse_input_wrong_type() {
        let err = parse_input::<Input>(params(json!({"confirm": "yes"}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "lenient_text")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_count")]
        total_rows: Option<u32>,
    }

    #[test]
    fn test_lenient_fields_accept_numbers_and_null() {
        let row: Row = serde_json::from_value(json!({"id": 42, "name": 7, "totalRows": null})).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.name.as_deref(), Some("7"));
        assert_eq!(row.total_rows, None);

        let row: Row = serde_json::from_value(json!({"id": "r-1", "totalRows": "12"})).unwrap();
        assert_eq!(row.id, "r-1");
        assert!(row.name.is_none());
        assert_eq!(row.total_rows, Some(12));

        let row: Row = serde_json::from_value(json!({"id": "r-2", "totalRows": -3})).unwrap();
        assert_eq!(row.total_rows, None);
    }

    #[test]
    fn test_string_or_number_rejects_null_id() {
        assert!(serde_json::from_value::<Row>(json!({"id": null})).is_err());
        assert!(serde_json::from_value::<Row>(json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_status_prefers_backend_message() {
        let err = ToolError::status(403, r#"{"message": "Forbidden for this organization"}"#);
        assert_eq!(
            err.render(),
            "Error: backend returned 403: Forbidden for this organization"
        );
    }

    #[test]
    fn test_status_falls_back_to_body() {
        let err = ToolError::status(502, "  bad gateway  ");
        assert_eq!(err.to_string(), "backend returned 502: bad gateway");

        let empty = ToolError::status(500, "");
        assert!(empty.to_string().contains("(empty body)"));
    }

    #[tokio::test]
    async fn test_to_definition_default() {
        struct DummyTool;

        #[async_trait]
        impl Tool for DummyTool {
            fn name(&self) -> &str {
                "dummy"
            }
            fn description(&self) -> &str {
                "A test tool"
            }
            fn parameters(&self) -> Value {
                json!({"type": "object", "properties": {}})
            }
            async fn execute(&self, _params: HashMap<String, Value>) -> String {
                "ok".into()
            }
        }

        let def = DummyTool.to_definition();
        assert_eq!(def.function.name, "dummy");
        assert_eq!(def.tool_type, "function");
        assert_eq!(DummyTool.execute(HashMap::new()).await, "ok");
    }
}
