// =============================================================================
// Central Application State
// =============================================================================
//
// Everything request handlers need, built once at startup and shared via
// `Arc<AppState>`. Nothing in here is mutated after construction, so no locks
// are required.
// =============================================================================

use std::sync::Arc;

use crate::frame::IndicatorEngine;
use crate::market_data::{HistoryRequest, MarketDataSource, OhlcvFetcher};
use crate::runtime_config::RuntimeConfig;
use crate::symbols::SymbolMap;

pub struct AppState {
    pub symbols: SymbolMap,
    pub fetcher: OhlcvFetcher,
    pub engine: IndicatorEngine,
    /// Range used when a request omits `period` / `interval`.
    pub default_request: HistoryRequest,
}

impl AppState {
    pub fn new(config: &RuntimeConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            symbols: config.symbol_map(),
            fetcher: OhlcvFetcher::new(source, config.exchange_suffix.clone()),
            engine: IndicatorEngine::new(config.compute_mode()),
            default_request: HistoryRequest {
                period: config.default_period.clone(),
                interval: config.default_interval.clone(),
            },
        }
    }
}
