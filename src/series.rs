// =============================================================================
// Series Ingest / Validation
// =============================================================================
//
// Turns an untrusted, provider-supplied OHLCV sequence into the immutable base
// series every indicator stage reads from. No resampling or gap filling takes
// place: one input row is one period.
//
// Rejected inputs:
//   - zero rows                         => SeriesError::EmptySeries
//   - timestamps not strictly ascending => MalformedSeries
//   - missing / non-finite close        => MalformedSeries
//   - missing / non-finite / negative volume => MalformedSeries
//   - present but non-finite open/high/low   => MalformedSeries
// =============================================================================

use tracing::debug;

use crate::error::{MalformedReason, SeriesError};
use crate::types::{RawBar, TimePoint};

/// Validated, chronologically ordered price/volume series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    points: Vec<TimePoint>,
}

impl Series {
    /// Validate `bars` and build the base series.
    pub fn ingest(bars: impl IntoIterator<Item = RawBar>) -> Result<Self, SeriesError> {
        let mut points: Vec<TimePoint> = Vec::new();

        for (index, bar) in bars.into_iter().enumerate() {
            if let Some(prev) = points.last() {
                if bar.timestamp <= prev.timestamp {
                    return Err(SeriesError::malformed(
                        index,
                        MalformedReason::NonIncreasingTimestamp,
                    ));
                }
            }
            points.push(validate_bar(index, bar)?);
        }

        if points.is_empty() {
            return Err(SeriesError::EmptySeries);
        }

        debug!(rows = points.len(), "series ingested");
        Ok(Self { points })
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for an ingested series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Volumes in chronological order.
    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }
}

fn validate_bar(index: usize, bar: RawBar) -> Result<TimePoint, SeriesError> {
    let close = match bar.close {
        None => return Err(SeriesError::malformed(index, MalformedReason::MissingClose)),
        Some(c) => finite(index, "close", c)?,
    };

    let volume = match bar.volume {
        None => return Err(SeriesError::malformed(index, MalformedReason::MissingVolume)),
        Some(v) => finite(index, "volume", v)?,
    };
    if volume < 0.0 {
        return Err(SeriesError::malformed(
            index,
            MalformedReason::NegativeVolume(volume),
        ));
    }

    Ok(TimePoint {
        timestamp: bar.timestamp,
        open: optional_finite(index, "open", bar.open)?,
        high: optional_finite(index, "high", bar.high)?,
        low: optional_finite(index, "low", bar.low)?,
        close,
        volume,
    })
}

fn finite(index: usize, field: &'static str, value: f64) -> Result<f64, SeriesError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SeriesError::malformed(index, MalformedReason::NonFinite { field }))
    }
}

fn optional_finite(
    index: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, SeriesError> {
    value.map(|v| finite(index, field, v)).transpose()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    /// Daily bars starting 2023-01-01 with open/high/low derived from close.
    pub(crate) fn daily_bars(closes: &[f64], volumes: &[f64]) -> Vec<RawBar> {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| RawBar {
                timestamp: start + Duration::days(i as i64),
                open: Some(close),
                high: Some(close + 1.0),
                low: Some(close - 1.0),
                close: Some(close),
                volume: Some(volume),
            })
            .collect()
    }

    #[test]
    fn ingest_empty_input_fails() {
        assert_eq!(Series::ingest(Vec::new()), Err(SeriesError::EmptySeries));
    }

    #[test]
    fn ingest_keeps_order_and_values() {
        let series = Series::ingest(daily_bars(&[10.0, 11.0, 12.0], &[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.volumes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.points()[1].high, Some(12.0));
    }

    #[test]
    fn ingest_rejects_duplicate_timestamp() {
        let mut bars = daily_bars(&[10.0, 11.0, 12.0], &[1.0, 2.0, 3.0]);
        bars[2].timestamp = bars[1].timestamp;
        assert_eq!(
            Series::ingest(bars),
            Err(SeriesError::MalformedSeries {
                index: 2,
                reason: MalformedReason::NonIncreasingTimestamp,
            })
        );
    }

    #[test]
    fn ingest_rejects_reversed_timestamps() {
        let mut bars = daily_bars(&[10.0, 11.0], &[1.0, 2.0]);
        bars.reverse();
        assert!(matches!(
            Series::ingest(bars),
            Err(SeriesError::MalformedSeries { index: 1, .. })
        ));
    }

    #[test]
    fn ingest_rejects_missing_or_nan_close() {
        let mut bars = daily_bars(&[10.0, 11.0], &[1.0, 2.0]);
        bars[0].close = None;
        assert_eq!(
            Series::ingest(bars.clone()),
            Err(SeriesError::malformed(0, MalformedReason::MissingClose))
        );

        bars[0].close = Some(f64::NAN);
        assert_eq!(
            Series::ingest(bars),
            Err(SeriesError::malformed(0, MalformedReason::NonFinite { field: "close" }))
        );
    }

    #[test]
    fn ingest_rejects_bad_volume() {
        let mut bars = daily_bars(&[10.0, 11.0], &[1.0, 2.0]);
        bars[1].volume = Some(-5.0);
        assert_eq!(
            Series::ingest(bars.clone()),
            Err(SeriesError::malformed(1, MalformedReason::NegativeVolume(-5.0)))
        );

        bars[1].volume = None;
        assert_eq!(
            Series::ingest(bars),
            Err(SeriesError::malformed(1, MalformedReason::MissingVolume))
        );
    }

    #[test]
    fn ingest_allows_absent_open_high_low() {
        let mut bars = daily_bars(&[10.0], &[1.0]);
        bars[0].open = None;
        bars[0].high = None;
        bars[0].low = None;
        let series = Series::ingest(bars).unwrap();
        assert_eq!(series.points()[0].open, None);
    }

    #[test]
    fn ingest_rejects_infinite_high() {
        let mut bars = daily_bars(&[10.0], &[1.0]);
        bars[0].high = Some(f64::INFINITY);
        assert_eq!(
            Series::ingest(bars),
            Err(SeriesError::malformed(0, MalformedReason::NonFinite { field: "high" }))
        );
    }
}
