//! `fieldcrypt-svc`: field encryption sidecar entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP spans).
//! 3. Build the [`FieldCipher`] from `ENCRYPTION_KEY` (degraded if invalid).
//! 4. Seed the [`PolicyCache`] and overlay the policy file, if configured.
//! 5. Spawn the policy refresh task.
//! 6. Build the Axum router and start the HTTP server.

mod config;
mod policy;
mod server;
mod telemetry;

use anyhow::Result;
use fieldcrypt::{CipherConfig, FieldCipher};
use tracing::{info, warn};

use config::Config;
use policy::PolicyCache;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "fieldcrypt-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cipher
    // -----------------------------------------------------------------------
    let cipher = FieldCipher::new(&CipherConfig::from_secret(cfg.encryption_key.as_deref()));
    if !cipher.is_ready() {
        warn!("starting in degraded mode: records pass through unencrypted");
    }

    // -----------------------------------------------------------------------
    // 4. Field policy
    // -----------------------------------------------------------------------
    let policy_cache = PolicyCache::new();
    if let Some(path) = &cfg.field_policy_path {
        policy::load_file(path, &policy_cache).await?;
    }

    // -----------------------------------------------------------------------
    // 5. Background tasks
    // -----------------------------------------------------------------------
    let refresh_interval = std::time::Duration::from_secs(cfg.policy_refresh_interval_secs);
    let _policy_refresh = cfg
        .field_policy_path
        .clone()
        .map(|path| policy::refresh_task(path, refresh_interval, policy_cache.clone()));

    // -----------------------------------------------------------------------
    // 6. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, policy_cache, cfg.record_kind_header_name.clone());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, router).await;

    telemetry::shutdown_telemetry();
    served?;
    Ok(())
}
