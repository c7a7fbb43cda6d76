//! Boundary coercion of loosely typed property values.
//!
//! Editors hand us JSON scalars of whatever type they had at hand. Each
//! property type has exactly one coercion function; the typed patches never
//! see raw JSON.

use serde_json::Value;
use shared::protocol::{display_json_scalar, format_decimal};

/// Truthiness used for boolean properties and the legacy `value` alias:
/// `true`, any string equal to `"true"` ignoring case, or anything loosely
/// equal to `1` (`1`, `"1"`, `" 1.0 "`).
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => {
            s.to_lowercase() == "true" || s.trim().parse::<f64>().ok() == Some(1.0)
        }
        _ => false,
    }
}

/// Best-effort numeric parse. `None` means the caller keeps its prior value.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// String form of a scalar. Arrays, objects and `null` are rejected.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(display_json_scalar(value)),
        _ => None,
    }
}

pub fn wire_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub fn wire_number(value: f64) -> String {
    format_decimal(value)
}
