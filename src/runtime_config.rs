// =============================================================================
// Runtime Configuration
// =============================================================================
//
// Every tunable setting of the analytics service lives here. All fields carry
// `#[serde(default)]` so that a partial (or empty) JSON file still loads and
// adding new fields never breaks an older config file.
// =============================================================================

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::frame::ComputeMode;
use crate::symbols::{default_egx_aliases, SymbolMap};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_period() -> String {
    "90d".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_exchange_suffix() -> String {
    ".CA".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// History range requested when the caller does not pass `period`.
    #[serde(default = "default_period")]
    pub default_period: String,

    /// Bar size requested when the caller does not pass `interval`.
    #[serde(default = "default_interval")]
    pub default_interval: String,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Suffix appended to local tickers on the first fetch attempt.
    #[serde(default = "default_exchange_suffix")]
    pub exchange_suffix: String,

    /// Local alias => provider symbol.
    #[serde(default = "default_egx_aliases")]
    pub symbol_map: HashMap<String, String>,

    /// Run indicator stages on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel_stages: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_period: default_period(),
            default_interval: default_interval(),
            yahoo_base_url: default_yahoo_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            exchange_suffix: default_exchange_suffix(),
            symbol_map: default_egx_aliases(),
            parallel_stages: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            aliases = config.symbol_map.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `EGX_BIND_ADDR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("EGX_BIND_ADDR") {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn compute_mode(&self) -> ComputeMode {
        if self.parallel_stages {
            ComputeMode::Parallel
        } else {
            ComputeMode::Sequential
        }
    }

    pub fn symbol_map(&self) -> SymbolMap {
        SymbolMap::new(&self.symbol_map)
    }
}
