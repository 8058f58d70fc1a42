// =============================================================================
// OHLCV fetch policy: retry with symbol variation
// =============================================================================
//
// EGX listings are usually quoted with an exchange suffix (`CIB.CA`), but
// indices and some tickers are not. The fetcher tries the suffixed form first
// and then the bare symbol, returning the first non-empty history. Each
// attempt uses a different symbol; an identical repeat is never made.
// =============================================================================

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::source::{FetchError, HistoryRequest, MarketDataSource};
use crate::types::RawBar;

#[derive(Clone)]
pub struct OhlcvFetcher {
    source: Arc<dyn MarketDataSource>,
    exchange_suffix: String,
}

impl OhlcvFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>, exchange_suffix: impl Into<String>) -> Self {
        Self {
            source,
            exchange_suffix: exchange_suffix.into(),
        }
    }

    /// Symbols to try, in order.
    pub fn candidates(&self, symbol: &str) -> Vec<String> {
        let suffix = self.exchange_suffix.as_str();
        if suffix.is_empty() || symbol.to_uppercase().ends_with(&suffix.to_uppercase()) {
            vec![symbol.to_string()]
        } else {
            vec![format!("{symbol}{suffix}"), symbol.to_string()]
        }
    }

    /// Fetch history for `symbol`, trying each candidate form in turn.
    ///
    /// Returns `NoData` when no candidate had rows. When every attempt failed
    /// outright the last failure is returned instead.
    #[instrument(skip(self), name = "fetcher::fetch")]
    pub async fn fetch(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<RawBar>, FetchError> {
        let mut last_error = None;
        let mut saw_empty = false;

        for candidate in self.candidates(symbol) {
            match self.source.history(&candidate, request).await {
                Ok(bars) if !bars.is_empty() => {
                    info!(symbol, candidate = %candidate, rows = bars.len(), "history fetched");
                    return Ok(bars);
                }
                Ok(_) => {
                    debug!(candidate = %candidate, "no rows for candidate symbol");
                    saw_empty = true;
                }
                Err(e) => {
                    warn!(candidate = %candidate, error = %e, "history request failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !saw_empty => Err(e),
            _ => Err(FetchError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }
}
