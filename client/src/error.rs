//! Error handling for the Textile Mill Inventory client

use serde_json::Value;
use shared::DraftError;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Local validation failures, surfaced before any request is made
    #[error("{0}")]
    Validation(#[from] DraftError),

    // Connection-level failures talking to the backend
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    // The backend answered with an error body; `message` is already the
    // one line the form should show
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Status code of a backend rejection, if that is what this is
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Extract the one message worth showing from a backend error body.
///
/// Precedence: a `lot_allocations` message (joined if several), then the
/// first field's first message, then a bare `detail`, then the fallback.
pub fn primary_message(body: &Value, fallback: &str) -> String {
    match body {
        Value::Object(map) => {
            if let Some(value) = map.get("lot_allocations") {
                if let Some(joined) = join_messages(value) {
                    return format!("Lot allocations error: {}", joined);
                }
            }

            for (key, value) in map {
                if key == "detail" {
                    continue;
                }
                if let Some(message) = first_message(value) {
                    return format!("{}: {}", key, message);
                }
            }

            if let Some(detail) = map.get("detail").and_then(Value::as_str) {
                return detail.to_string();
            }

            fallback.to_string()
        }
        Value::String(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

/// All messages under a key, comma-joined the way the form displays them
fn join_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// Only the first message under a key
fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_string),
        _ => None,
    }
}
