// =============================================================================
// Yahoo Finance chart API client
// =============================================================================
//
// GET {base}/v8/finance/chart/{symbol}?range={period}&interval={interval}
//
// The payload is columnar: one `timestamp` array (unix seconds) and one
// `quote` object holding parallel open/high/low/close/volume arrays whose
// entries may be null. Rows with a null close are illiquid periods and are
// dropped; a null volume is reported as 0.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::source::{FetchError, HistoryRequest, MarketDataSource};
use crate::types::RawBar;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) egx-analytics/0.1";

/// Error code Yahoo uses for unknown or delisted symbols.
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    #[instrument(skip(self), name = "yahoo::history")]
    async fn history(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<Vec<RawBar>, FetchError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", request.period.as_str()),
                ("interval", request.interval.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(symbol, "symbol not found upstream");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ChartEnvelope = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let bars = bars_from_chart(envelope)?;
        debug!(symbol, rows = bars.len(), "chart history fetched");
        Ok(bars)
    }
}

// -----------------------------------------------------------------------------
// Payload
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

fn bars_from_chart(envelope: ChartEnvelope) -> Result<Vec<RawBar>, FetchError> {
    let chart = envelope.chart;

    if let Some(err) = chart.error {
        if err.code == NOT_FOUND_CODE {
            return Ok(Vec::new());
        }
        return Err(FetchError::Upstream {
            status: StatusCode::OK.as_u16(),
            message: format!("{}: {}", err.code, err.description.unwrap_or_default()),
        });
    }

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars: Vec<RawBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &secs) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, i) else {
            continue;
        };
        let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| FetchError::Decode(format!("timestamp {secs} out of range")))?;

        let bar = RawBar {
            timestamp,
            open: value_at(&quote.open, i),
            high: value_at(&quote.high, i),
            low: value_at(&quote.low, i),
            close: Some(close),
            volume: Some(value_at(&quote.volume, i).unwrap_or(0.0)),
        };

        // The live session is sometimes repeated as a trailing row.
        match bars.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => {
                warn!(%timestamp, "duplicate chart row, keeping the latest");
                *last = bar;
            }
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RawBar>, FetchError> {
        bars_from_chart(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn parses_columnar_quote() {
        let json = r#"{"chart":{"result":[{
            "meta":{"symbol":"CIB.CA"},
            "timestamp":[1672531200,1672617600],
            "indicators":{"quote":[{
                "open":[10.0,11.0],"high":[11.0,12.0],"low":[9.0,10.0],
                "close":[10.5,11.5],"volume":[100,200]
            }]}
        }],"error":null}}"#;

        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 1_672_531_200);
        assert_eq!(bars[0].close, Some(10.5));
        assert_eq!(bars[1].volume, Some(200.0));
        assert_eq!(bars[1].high, Some(12.0));
    }

    #[test]
    fn drops_rows_without_close_and_zeroes_null_volume() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1,2,3],
            "indicators":{"quote":[{
                "open":[1.0,null,3.0],"high":[1.0,null,3.0],"low":[1.0,null,3.0],
                "close":[1.0,null,3.0],"volume":[null,null,7]
            }]}
        }],"error":null}}"#;

        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, Some(0.0));
        assert_eq!(bars[1].close, Some(3.0));
    }

    #[test]
    fn duplicate_trailing_row_keeps_latest() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[10,20,20],
            "indicators":{"quote":[{"close":[1.0,2.0,2.5],"volume":[1,2,3]}]}
        }],"error":null}}"#;

        let bars = parse(json).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, Some(2.5));
        assert_eq!(bars[1].open, None);
    }

    #[test]
    fn not_found_error_is_empty_history() {
        let json = r#"{"chart":{"result":null,"error":{
            "code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn other_chart_error_is_upstream() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(parse(json), Err(FetchError::Upstream { .. })));
    }

    #[test]
    fn result_without_timestamps_is_empty() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }
}
