//! Request and response types exchanged with the fieldcrypt service.
//!
//! All bodies are JSON.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field operations
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`, `POST /decrypt` and `POST /migrate`.
///
/// `payload` is a single record. The sensitive fields are taken from
/// `fields` when present, otherwise from the record kind named in the
/// `X-Record-Kind` request header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRequest {
    /// JSON object whose listed fields are transformed.
    pub payload: serde_json::Value,
    /// Explicit field allow-list; overrides the record kind policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Successful response body for the field operations.
///
/// `payload` has exactly the keys of the request payload; only the listed
/// string fields differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldResponse {
    /// Transformed record.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether a valid 32-byte encryption key is configured.
    pub key_ready: bool,
    /// Number of record kinds with a field policy.
    pub record_kinds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_request_without_fields() {
        let req: FieldRequest =
            serde_json::from_value(json!({"payload": {"notes": "BP normal"}})).unwrap();
        assert!(req.fields.is_none());
        assert_eq!(req.payload["notes"], "BP normal");
    }

    #[test]
    fn field_request_with_fields() {
        let req: FieldRequest = serde_json::from_value(json!({
            "payload": {"notes": "x"},
            "fields": ["notes"]
        }))
        .unwrap();
        assert_eq!(req.fields.as_deref(), Some(&["notes".to_string()][..]));
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&crate::ServiceError::BadRequest("missing fields".into()));
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("missing fields"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_ready: true,
            record_kinds: 3,
        };
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json, json!({"status": "ok", "key_ready": true, "record_kinds": 3}));
    }
}
