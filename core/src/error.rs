//! Error types for the studio API client.
//!
//! # Design
//! `TransportError` says what went wrong on the wire. `ApiError` is the one
//! shape callers ever see: a human-readable message plus the transport cause.
//! The message is picked with a fixed precedence (server `detail`, then the
//! transport's own message, then `FALLBACK_MESSAGE`) by `ApiError::normalize`,
//! which only the request pipeline calls.

use std::time::Duration;

use thiserror::Error;

/// Message used when neither the server nor the transport says anything.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Underlying cause of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    /// No response arrived within the configured timeout.
    #[error("timeout of {}ms exceeded", .after.as_millis())]
    Timeout { after: Duration },

    /// Connection-level failure. May carry an empty message.
    #[error("{0}")]
    Network(String),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// The response payload did not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// The transport's own message, or `None` if it has nothing to say.
    pub fn message(&self) -> Option<String> {
        let message = self.to_string();
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }

    /// The server-supplied `detail` field of a JSON error body.
    ///
    /// Strings are used verbatim; other non-null values (e.g. a list of
    /// validation errors) are rendered as compact JSON.
    pub fn detail(&self) -> Option<String> {
        let TransportError::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// The normalized error every failed call resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    #[source]
    cause: TransportError,
}

impl ApiError {
    pub(crate) fn normalize(cause: TransportError) -> Self {
        let message = cause
            .detail()
            .or_else(|| cause.message())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self { message, cause }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &TransportError {
        &self.cause
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            TransportError::Status { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, TransportError::Timeout { .. })
    }
}
