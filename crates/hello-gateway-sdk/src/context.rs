//! Per-invocation context handed to handlers
//!
//! The host builds one `Context` per request. Handlers may ignore it entirely;
//! it exists so every handler shares the same invocation signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request identifier for tracing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context passed to every handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Unique request identifier
    pub request_id: RequestId,

    /// Name of the handler the host resolved for this request
    pub handler: String,

    /// When the host received the request
    pub received_at: DateTime<Utc>,
}

impl Context {
    /// Create a new context for a request routed to `handler`
    pub fn new(handler: impl Into<String>) -> Self {
        Self::with_request_id(handler, RequestId::new())
    }

    pub fn with_request_id(handler: impl Into<String>, request_id: RequestId) -> Self {
        Self {
            request_id,
            handler: handler.into(),
            received_at: Utc::now(),
        }
    }
}
