use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    MissingAddr,
    UnsupportedValueType,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::MissingAddr => "missing_addr",
            ErrorCode::UnsupportedValueType => "unsupported_value_type",
            ErrorCode::Internal => "internal",
        }
    }
}

/// Error body returned by the command endpoint. Serializes to the same shape
/// as a rejected [`CommandReply`](crate::protocol::CommandReply).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub ok: bool,
    pub error: ErrorCode,
}

impl ApiError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            ok: false,
            error: code,
        }
    }
}

#[derive(Debug, Error)]
#[error("{}: {message}", code.as_str())]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self::new(value.code)
    }
}
