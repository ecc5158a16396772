//! Field policy: which fields of each record kind are encrypted.
//!
//! # Responsibilities
//!
//! - Hold the built-in policy for the known record kinds.
//! - Optionally overlay a YAML (or JSON) policy file at startup and on a
//!   refresh interval.
//!
//! # Policy file format
//!
//! ```yaml
//! record_kinds:
//!   lab_result: [result_text, notes]
//!   prescription: [notes, instructions]
//! ```
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** This module decides *which* fields are
//!   sensitive, never how they are transformed.

pub mod cache;

pub use cache::{FieldList, PolicyCache};

use std::{collections::HashMap, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::time;
use tracing::{info, warn};

/// On-disk shape of a policy file.
///
/// Unknown top-level keys are rejected so a misspelt `record_kinds` fails the
/// load instead of resetting the cache to the built-ins.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    #[serde(default)]
    record_kinds: HashMap<String, Vec<String>>,
}

/// Read the policy file at `path` and atomically replace the cache.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is neither valid YAML nor
/// JSON, or contains an empty kind or field name.
pub async fn load_file(path: &str, cache: &PolicyCache) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read field policy file: {path}"))?;

    let file = parse_policy(&text)
        .with_context(|| format!("failed to parse field policy file: {path}"))?;

    let overrides = file.record_kinds.len();
    cache
        .replace_all(file.record_kinds)
        .with_context(|| format!("invalid field policy file: {path}"))?;

    info!(
        path = %path,
        overrides,
        record_kinds = cache.len(),
        "field policy loaded"
    );
    Ok(())
}

/// Spawn a background task that reloads the policy file every `interval`.
///
/// On reload failure the previous policy is retained and a warning is
/// emitted; the service keeps running with the stale policy.
pub fn refresh_task(
    path: String,
    interval: Duration,
    cache: PolicyCache,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        // First tick fires immediately; the startup load already ran.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = load_file(&path, &cache).await {
                warn!(error = %e, "field policy reload failed; retaining previous policy");
            }
        }
    })
}

fn parse_policy(text: &str) -> Result<PolicyFile> {
    if text.trim().is_empty() {
        return Ok(PolicyFile::default());
    }
    if let Ok(parsed) = serde_yaml::from_str(text) {
        return Ok(parsed);
    }
    serde_json::from_str(text).context("not valid YAML or JSON")
}
