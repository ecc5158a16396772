//! Axum middleware layers applied to the router.
//!
//! Request tracing, timeout enforcement and response compression come from
//! `tower-http`; this module holds the limits and the response headers that
//! keep decrypted record contents out of intermediary caches.

use std::time::Duration;

use axum::http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted request body. Records are single rows, not batches.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// `Cache-Control: no-store` on every response.
pub fn no_store() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
}
