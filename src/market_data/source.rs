use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RawBar;

fn default_period() -> String {
    "90d".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

/// How much history to request and at which bar size.
///
/// Values are passed to the provider verbatim (`"90d"`, `"1d"`, `"1h"`...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            period: default_period(),
            interval: default_interval(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data for symbol {symbol}")]
    NoData { symbol: String },

    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market data provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected market data payload: {0}")]
    Decode(String),
}

/// Anything that can return raw OHLCV history for a provider symbol.
///
/// An unknown symbol is an empty history, not an error.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn history(&self, symbol: &str, request: &HistoryRequest)
        -> Result<Vec<RawBar>, FetchError>;
}
