pub mod fetcher;
pub mod source;
pub mod yahoo;

pub use fetcher::OhlcvFetcher;
pub use source::{FetchError, HistoryRequest, MarketDataSource};
pub use yahoo::YahooClient;
