//! Configuration loading and validation for the fieldcrypt service.
//!
//! All values are read from environment variables at startup. The process
//! exits with a clear error if a value is present but unusable. A missing or
//! wrong-length `ENCRYPTION_KEY` is not one of those: the service starts in
//! degraded mode and reports it on `/health`.

use std::fmt;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use serde::Deserialize;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Field encryption secret; its UTF-8 bytes must number exactly 32.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// HTTP header used to name the record kind of each request.
    #[serde(default = "default_record_kind_header")]
    pub record_kind_header_name: String,

    /// Optional YAML file extending or overriding the built-in field policy.
    #[serde(default)]
    pub field_policy_path: Option<String>,

    /// How often (seconds) to reload the field policy file.
    #[serde(default = "default_policy_refresh_interval")]
    pub policy_refresh_interval_secs: u64,

    /// OTLP endpoint for span export. Spans are not exported when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_record_kind_header() -> String {
    "X-Record-Kind".into()
}
fn default_policy_refresh_interval() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        HeaderName::try_from(self.record_kind_header_name.as_str())
            .with_context(|| {
                format!(
                    "RECORD_KIND_HEADER_NAME is not a valid header name: {:?}",
                    self.record_kind_header_name
                )
            })?;

        if self.policy_refresh_interval_secs == 0 {
            anyhow::bail!("POLICY_REFRESH_INTERVAL_SECS must be > 0");
        }
        if let Some(path) = &self.field_policy_path {
            ensure_non_empty(path, "FIELD_POLICY_PATH")?;
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("listen_port", &self.listen_port)
            .field("record_kind_header_name", &self.record_kind_header_name)
            .field("field_policy_path", &self.field_policy_path)
            .field(
                "policy_refresh_interval_secs",
                &self.policy_refresh_interval_secs,
            )
            .field(
                "otel_exporter_otlp_endpoint",
                &self.otel_exporter_otlp_endpoint,
            )
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty when set");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            encryption_key: Some("0123456789abcdef0123456789abcdef".into()),
            listen_port: default_listen_port(),
            record_kind_header_name: default_record_kind_header(),
            field_policy_path: None,
            policy_refresh_interval_secs: default_policy_refresh_interval(),
            otel_exporter_otlp_endpoint: None,
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_record_kind_header(), "X-Record-Kind");
        assert_eq!(default_policy_refresh_interval(), 300);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn validate_accepts_missing_key() {
        let cfg = Config {
            encryption_key: None,
            ..base()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_accepts_short_key() {
        let cfg = Config {
            encryption_key: Some("tenbytekey".into()),
            ..base()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_refresh_interval() {
        let cfg = Config {
            policy_refresh_interval_secs: 0,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_header_name() {
        let cfg = Config {
            record_kind_header_name: "X Record Kind".into(),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_policy_path() {
        let cfg = Config {
            field_policy_path: Some("  ".into()),
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let dbg = format!("{:?}", base());
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("0123456789abcdef"));
    }
}
