use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DEFAULT_ADDRESS;

/// Wire form of a user-driven change, posted to `/api/command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMessage {
    pub addr: String,
    pub value: String,
}

impl CommandMessage {
    /// Builds a message, substituting the placeholder address for an empty one.
    pub fn new(addr: impl Into<String>, value: impl Into<String>) -> Self {
        let addr = addr.into();
        let addr = if addr.trim().is_empty() {
            DEFAULT_ADDRESS.to_string()
        } else {
            addr
        };
        Self {
            addr,
            value: value.into(),
        }
    }
}

/// Structured reply of the command endpoint. Replies that do not match this
/// shape are still accepted by clients and kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Asynchronous status update broadcast to every subscribed control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushUpdate {
    #[serde(rename = "commandId")]
    pub command_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
}

impl PushUpdate {
    pub fn value(command_id: impl Into<String>, value: Value) -> Self {
        Self {
            command_id: command_id.into(),
            value: Some(value),
            text: None,
        }
    }

    pub fn text(command_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            command_id: command_id.into(),
            value: None,
            text: Some(Value::String(text.into())),
        }
    }

    /// Display text carried by the update; `value` wins over `text`.
    pub fn display_text(&self) -> Option<String> {
        self.value
            .as_ref()
            .or(self.text.as_ref())
            .map(display_json_scalar)
    }
}

/// Status query sent by a push subscriber: `{"query": ["/addr1", "/addr2"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    pub query: Vec<String>,
}

/// Renders a JSON value the way a loosely typed client would stringify it:
/// strings without quotes, whole numbers without a fraction, `null` as empty.
pub fn display_json_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_decimal(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Decimal string form of a number: `50.0` → `"50"`, `4.5` → `"4.5"`.
pub fn format_decimal(value: f64) -> String {
    if value == 0.0 {
        // covers -0.0 as well
        return "0".to_string();
    }
    format!("{value}")
}
