//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{ErrorResponse, FieldRequest, FieldResponse, HealthResponse},
    ServiceError,
};
use fieldcrypt::{decrypt_object, encrypt_object, seal_object};
use tracing::debug;

use super::state::AppState;
use crate::policy::FieldList;

/// Which projection a request applies.
#[derive(Debug, Clone, Copy)]
enum Operation {
    Encrypt,
    Decrypt,
    Migrate,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::Migrate => "migrate",
        }
    }
}

/// `POST /encrypt`: encrypt the sensitive fields of a record before it is stored.
pub async fn encrypt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FieldRequest>,
) -> Response {
    transform(&state, &headers, req, Operation::Encrypt)
}

/// `POST /decrypt`: restore the sensitive fields of a record read from storage.
///
/// Fields that hold legacy plaintext are returned as stored.
pub async fn decrypt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FieldRequest>,
) -> Response {
    transform(&state, &headers, req, Operation::Decrypt)
}

/// `POST /migrate`: encrypt only the sensitive fields that are still plaintext.
pub async fn migrate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FieldRequest>,
) -> Response {
    transform(&state, &headers, req, Operation::Migrate)
}

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when a valid encryption key is configured and
/// `503 Service Unavailable` otherwise. Field endpoints keep answering while
/// degraded; this is where the condition becomes visible.
pub async fn health(State(state): State<AppState>) -> Response {
    let key_ready = state.cipher.is_ready();

    let (status_code, status_str) = if key_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        key_ready,
        record_kinds: state.policy_cache.len(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn transform(
    state: &AppState,
    headers: &HeaderMap,
    req: FieldRequest,
    op: Operation,
) -> Response {
    let fields = match resolve_fields(state, headers, req.fields) {
        Ok(f) => f,
        Err(e) => return error_response(&e),
    };
    if !req.payload.is_object() {
        let err = ServiceError::BadRequest("payload must be a JSON object".into());
        return error_response(&err);
    }

    let payload = match op {
        Operation::Encrypt => encrypt_object(&state.cipher, &req.payload, &fields[..]),
        Operation::Decrypt => decrypt_object(&state.cipher, &req.payload, &fields[..]),
        Operation::Migrate => seal_object(&state.cipher, &req.payload, &fields[..]),
    };
    debug!(
        operation = op.as_str(),
        fields = fields.len(),
        key_ready = state.cipher.is_ready(),
        "record fields projected"
    );

    (StatusCode::OK, Json(FieldResponse { payload })).into_response()
}

/// Pick the field allow-list: the explicit `fields` list if given, else the
/// policy of the record kind named in the configured header.
fn resolve_fields(
    state: &AppState,
    headers: &HeaderMap,
    explicit: Option<Vec<String>>,
) -> Result<FieldList, ServiceError> {
    if let Some(fields) = explicit {
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ServiceError::BadRequest("field names must not be empty".into()));
        }
        return Ok(fields.into());
    }

    let header_name = state.record_kind_header_name.as_str();
    let kind = headers
        .get(header_name)
        .ok_or_else(|| {
            ServiceError::BadRequest(format!("missing {header_name} header and no fields list"))
        })?
        .to_str()
        .map_err(|_| {
            ServiceError::BadRequest(format!("{header_name} header contains non-ASCII characters"))
        })?;

    state
        .policy_cache
        .get(kind)
        .map_err(|e| ServiceError::UnknownRecordKind(e.0))
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}
