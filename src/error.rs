use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Per-field messages produced by client-side validation, keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Shown for any list or record whose payload did not decode.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid data format received from server";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, timeout, or a non-2xx answer without a usable detail.
    #[error("transport failure: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        /// A server-provided `detail` on a 5xx, shown in place of the fallback.
        detail: Option<String>,
    },

    /// 4xx with a `detail` message from the server.
    #[error("{detail}")]
    ValidationRejected { status: u16, detail: String },

    #[error("invalid response shape: expected {expected}, found {found}")]
    InvalidResponseShape { expected: &'static str, found: String },

    /// The request was superseded or its owner tore down.
    #[error("request cancelled")]
    Cancelled,

    /// Rejected locally before anything was sent.
    #[error("invalid input: {}", describe_fields(.0))]
    InvalidInput(FieldErrors),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Classify a non-2xx response from its status and raw body.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|body| body.get("detail").and_then(detail_text));

        match detail {
            Some(detail) if (400..500).contains(&status) => {
                ApiError::ValidationRejected { status, detail }
            }
            detail => ApiError::Transport {
                status: Some(status),
                message: format!("server responded with status {status}"),
                detail,
            },
        }
    }

    /// Text a front-end shows for this failure. Server details are passed
    /// through verbatim; anything without one falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::ValidationRejected { detail, .. } => detail.clone(),
            ApiError::Transport {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::InvalidResponseShape { .. } => INVALID_FORMAT_MESSAGE.to_string(),
            ApiError::InvalidInput(fields) => describe_fields(fields),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            detail: None,
        }
    }
}

/// `detail` is a plain string for handled errors, or a list of
/// `{loc, msg, type}` objects when the server's request validation fails.
fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}
