// =============================================================================
// EGX Analytics: technical indicators over daily / intraday OHLCV series
// =============================================================================
//
// Pipeline: provider bars -> Series::ingest -> IndicatorEngine::compute ->
// IndicatorFrame -> JSON rows. The engine itself performs no I/O; market
// data, symbol aliases and HTTP live in their own modules.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod series;
pub mod symbols;
pub mod types;

pub use error::{MalformedReason, SeriesError};
pub use frame::{ComputeMode, IndicatorColumn, IndicatorEngine, IndicatorFrame};
pub use series::Series;
pub use types::{RawBar, TimePoint};
