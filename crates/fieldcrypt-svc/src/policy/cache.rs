//! In-memory field policy, keyed by record kind name.
//!
//! Seeded from the built-in [`RecordKind`] constants and optionally extended
//! from a policy file. The cache uses `arc-swap` for lock-free reads on the
//! hot path.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwap;
use fieldcrypt::{RecordKind, UnknownRecordKind};
use thiserror::Error;

/// Errors from replacing the policy cache.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A policy entry has an empty kind name or field name.
    #[error("invalid policy entry for record kind {kind:?}: {reason}")]
    InvalidEntry { kind: String, reason: &'static str },
}

/// Ordered list of sensitive field names for one record kind.
pub type FieldList = Arc<[String]>;

/// Shared, lock-free map from record kind name to its sensitive fields.
///
/// Backed by [`ArcSwap`] so readers never block and the refresh task can
/// atomically swap in a new map.
#[derive(Clone, Debug)]
pub struct PolicyCache {
    inner: Arc<ArcSwap<HashMap<String, FieldList>>>,
}

impl PolicyCache {
    /// Create a cache holding only the built-in record kinds.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::new(Arc::new(builtin_policy()))),
        }
    }

    /// Return the number of record kinds currently known.
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    /// Look up the sensitive fields of a record kind.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRecordKind`] if `kind` is not present.
    pub fn get(&self, kind: &str) -> Result<FieldList, UnknownRecordKind> {
        self.inner
            .load()
            .get(kind)
            .cloned()
            .ok_or_else(|| UnknownRecordKind(kind.to_owned()))
    }

    /// Atomically replace the policy with the built-ins overlaid by `overrides`.
    ///
    /// An override for a built-in kind replaces its field list wholesale. On
    /// error the current policy is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidEntry`] if any kind or field name is empty.
    pub fn replace_all(&self, overrides: HashMap<String, Vec<String>>) -> Result<(), PolicyError> {
        let mut map = builtin_policy();
        for (kind, fields) in overrides {
            if kind.trim().is_empty() {
                return Err(PolicyError::InvalidEntry {
                    kind,
                    reason: "record kind name is empty",
                });
            }
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(PolicyError::InvalidEntry {
                    kind,
                    reason: "field name is empty",
                });
            }
            map.insert(kind, fields.into());
        }
        self.inner.store(Arc::new(map));
        Ok(())
    }
}

impl Default for PolicyCache {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_policy() -> HashMap<String, FieldList> {
    RecordKind::ALL
        .into_iter()
        .map(|kind| {
            let fields: FieldList = kind
                .sensitive_fields()
                .iter()
                .map(|f| (*f).to_owned())
                .collect();
            (kind.as_str().to_owned(), fields)
        })
        .collect()
}
