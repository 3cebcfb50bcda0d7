//! JSON response envelope shared by every `/api` route.
//!
//! Success bodies carry `success: true` plus whichever of `data`, `count`,
//! `message` and `timestamp` the route fills in. Failure bodies carry
//! `success: false` and an `error` string. Clients decode the envelope
//! regardless of the HTTP status code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope for the proxy's REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload of a successful data-bearing call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of entries in `data` for list calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Human-readable acknowledgment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server time, set by the health probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Failure description when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            timestamp: None,
            error: None,
        }
    }

    /// A successful response carrying only a message.
    #[must_use]
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.into()),
            timestamp: None,
            error: None,
        }
    }

    /// A failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            message: None,
            timestamp: None,
            error: Some(error.into()),
        }
    }

    /// Attaches a timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Converts the envelope into a `Result`.
    ///
    /// A failure without an `error` field yields `fallback` as its message.
    ///
    /// # Errors
    ///
    /// Returns the envelope's error string when `success` is false.
    pub fn into_result(self, fallback: &str) -> Result<Self, String> {
        if self.success {
            Ok(self)
        } else {
            Err(self.error.unwrap_or_else(|| fallback.to_string()))
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A successful list response; `count` is the number of entries.
    #[must_use]
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }
}

/// Envelope for responses that never carry `data`.
pub type Ack = ApiResponse<serde_json::Value>;
