//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::UnknownRecordKind`] → 400
///
/// A missing or invalid encryption key is deliberately absent here: field
/// operations fail open and keep answering 200.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: no field list, bad header, or non-object payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The named record kind has no field policy.
    #[error("unknown record kind: {0}")]
    UnknownRecordKind(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::UnknownRecordKind(_) => 400,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::UnknownRecordKind(_) => "unknown_record_kind",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(
            ServiceError::UnknownRecordKind("x".into()).http_status(),
            400
        );
    }

    #[test]
    fn codes_are_snake_case() {
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(
            ServiceError::UnknownRecordKind("lab".into()).code(),
            "unknown_record_kind"
        );
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::UnknownRecordKind("lab_result".into());
        assert!(e.to_string().contains("lab_result"));
    }
}
