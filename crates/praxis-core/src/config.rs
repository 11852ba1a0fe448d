//! Configuration for the Praxis audit core.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`PRAXIS__` prefix, `__` separator)
//! 2. Config file (`praxis.toml`)
//! 3. Defaults

use serde::Deserialize;

use crate::PraxisError;

/// Top-level Praxis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PraxisConfig {
    /// How long a freshly declared intent token stays valid (default: 30).
    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,
}

impl PraxisConfig {
    /// Load configuration from `{prefix}.toml` and `PRAXIS__` environment
    /// variables, falling back to defaults when neither is present.
    pub fn load(prefix: &str) -> Result<Self, PraxisError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(prefix).required(false))
            .add_source(config::Environment::with_prefix("PRAXIS").separator("__"))
            .build()
            .map_err(|e| PraxisError::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| PraxisError::Config(e.to_string()))?;

        tracing::debug!(
            token_expiry_minutes = cfg.token_expiry_minutes,
            "Configuration loaded"
        );
        Ok(cfg)
    }

    /// The default validity window applied to new intent tokens when the
    /// caller does not supply an explicit `expires_at`.
    pub fn default_expiry(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_expiry_minutes)
    }
}

impl Default for PraxisConfig {
    fn default() -> Self {
        Self {
            token_expiry_minutes: default_token_expiry_minutes(),
        }
    }
}

fn default_token_expiry_minutes() -> i64 {
    30
}
