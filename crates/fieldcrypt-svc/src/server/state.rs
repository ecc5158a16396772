//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fieldcrypt::{CipherConfig, FieldCipher};

use crate::policy::PolicyCache;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for
/// each request without copying key material or policy maps.
#[derive(Clone)]
pub struct AppState {
    /// Field cipher built from the configured key; degraded if the key is invalid.
    pub cipher: Arc<FieldCipher>,
    /// Lock-free field policy keyed by record kind.
    pub policy_cache: PolicyCache,
    /// Name of the HTTP header that names the record kind of a request.
    pub record_kind_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] from its parts.
    pub fn new(
        cipher: FieldCipher,
        policy_cache: PolicyCache,
        record_kind_header_name: String,
    ) -> Self {
        Self {
            cipher: Arc::new(cipher),
            policy_cache,
            record_kind_header_name: Arc::new(record_kind_header_name),
        }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with no key (degraded) and the built-in
    /// policy, suitable for tests.
    fn default() -> Self {
        Self::new(
            FieldCipher::new(&CipherConfig::from_secret(None)),
            PolicyCache::new(),
            "X-Record-Kind".into(),
        )
    }
}
