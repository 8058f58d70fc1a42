// =============================================================================
// Indicator Frame: stage orchestration and output rows
// =============================================================================
//
// Each stage is a pure function over the close and volume columns of the
// series, returning `[(IndicatorColumn, Column)]`. The engine extracts those
// columns once, runs the stages (sequentially or on the rayon pool), checks that
// every column lines up with the series and merges them into one frame.
// Stages never see each other's output, so no locking is needed.
//
// Output rows translate "no value" and any non-finite number into `None`, so
// a NaN can never reach the JSON boundary.
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SeriesError;
use crate::indicators::{bollinger, ema, macd, obv, rsi, sma};
use crate::series::Series;
use crate::types::TimePoint;

/// A derived column. `None` is the explicit "no value" marker.
pub type Column = Vec<Option<f64>>;

pub const MA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const BB_PERIOD: usize = 20;
pub const BB_NUM_STD: f64 = 2.0;

// =============================================================================
// Column names
// =============================================================================

/// The fixed set of derived columns, declared in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorColumn {
    Sma20,
    Ema20,
    Rsi14,
    Macd,
    MacdSignal,
    Obv,
    BbUpper,
    BbLower,
}

impl IndicatorColumn {
    pub const ALL: [Self; 8] = [
        Self::Sma20,
        Self::Ema20,
        Self::Rsi14,
        Self::Macd,
        Self::MacdSignal,
        Self::Obv,
        Self::BbUpper,
        Self::BbLower,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sma20 => "SMA_20",
            Self::Ema20 => "EMA_20",
            Self::Rsi14 => "RSI_14",
            Self::Macd => "MACD",
            Self::MacdSignal => "MACD_signal",
            Self::Obv => "OBV",
            Self::BbUpper => "BB_upper",
            Self::BbLower => "BB_lower",
        }
    }
}

impl fmt::Display for IndicatorColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Stages
// =============================================================================

/// Independent transform stages. Each reads only the base columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MovingAverage,
    Momentum,
    Trend,
    VolumeFlow,
    Volatility,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::MovingAverage,
        Self::Momentum,
        Self::Trend,
        Self::VolumeFlow,
        Self::Volatility,
    ];

    /// Compute this stage's columns. `closes` and `volumes` are row-aligned.
    pub fn run(self, closes: &[f64], volumes: &[f64]) -> Vec<(IndicatorColumn, Column)> {
        match self {
            Self::MovingAverage => vec![
                (IndicatorColumn::Sma20, dense(sma::calculate_sma(closes, MA_PERIOD))),
                (IndicatorColumn::Ema20, dense(ema::calculate_ema(closes, MA_PERIOD))),
            ],
            Self::Momentum => vec![(
                IndicatorColumn::Rsi14,
                dense(rsi::calculate_rsi(closes, RSI_PERIOD)),
            )],
            Self::Trend => {
                let m = macd::calculate_macd(closes);
                vec![
                    (IndicatorColumn::Macd, dense(m.macd)),
                    (IndicatorColumn::MacdSignal, dense(m.signal)),
                ]
            }
            Self::VolumeFlow => vec![(
                IndicatorColumn::Obv,
                dense(obv::calculate_obv(closes, volumes)),
            )],
            Self::Volatility => {
                let bb = bollinger::calculate_bollinger(closes, BB_PERIOD, BB_NUM_STD);
                vec![
                    (IndicatorColumn::BbUpper, bb.upper),
                    (IndicatorColumn::BbLower, bb.lower),
                ]
            }
        }
    }
}

fn dense(values: Vec<f64>) -> Column {
    values.into_iter().map(Some).collect()
}

// =============================================================================
// Frame
// =============================================================================

/// The base series plus every derived column, all aligned row for row.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    series: Series,
    columns: BTreeMap<IndicatorColumn, Column>,
}

impl IndicatorFrame {
    fn new(series: Series) -> Self {
        Self {
            series,
            columns: BTreeMap::new(),
        }
    }

    fn insert(&mut self, column: IndicatorColumn, values: Column) -> Result<(), SeriesError> {
        if values.len() != self.series.len() {
            return Err(SeriesError::ColumnLength {
                column: column.name(),
                expected: self.series.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(column, values);
        Ok(())
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn column(&self, column: IndicatorColumn) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Columns in output order.
    pub fn columns(&self) -> impl Iterator<Item = (IndicatorColumn, &[Option<f64>])> {
        self.columns.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Serializable rows, with indicator values attached.
    pub fn to_rows(&self) -> Vec<PriceRow> {
        self.series
            .points()
            .iter()
            .enumerate()
            .map(|(i, point)| PriceRow {
                point: *point,
                indicators: Some(self.indicator_row(i)),
            })
            .collect()
    }

    fn indicator_row(&self, i: usize) -> IndicatorRow {
        let value = |c: IndicatorColumn| {
            self.columns
                .get(&c)
                .and_then(|col| col.get(i).copied().flatten())
                .and_then(finite_or_none)
        };

        IndicatorRow {
            sma_20: value(IndicatorColumn::Sma20),
            ema_20: value(IndicatorColumn::Ema20),
            rsi_14: value(IndicatorColumn::Rsi14),
            macd: value(IndicatorColumn::Macd),
            macd_signal: value(IndicatorColumn::MacdSignal),
            obv: value(IndicatorColumn::Obv),
            bb_upper: value(IndicatorColumn::BbUpper),
            bb_lower: value(IndicatorColumn::BbLower),
        }
    }
}

/// Boundary conversion: anything that is not a finite number becomes `None`.
pub fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Rows of a series without indicators.
pub fn price_rows(series: &Series) -> Vec<PriceRow> {
    series
        .points()
        .iter()
        .map(|point| PriceRow {
            point: *point,
            indicators: None,
        })
        .collect()
}

// =============================================================================
// Engine
// =============================================================================

/// How the independent stages are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComputeMode {
    Sequential,
    #[default]
    Parallel,
}

/// Builds an `IndicatorFrame` from a validated series.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine {
    mode: ComputeMode,
}

impl IndicatorEngine {
    pub fn new(mode: ComputeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ComputeMode {
        self.mode
    }

    pub fn compute(&self, series: &Series) -> Result<IndicatorFrame, SeriesError> {
        let closes = series.closes();
        let volumes = series.volumes();

        let outputs: Vec<Vec<(IndicatorColumn, Column)>> = match self.mode {
            ComputeMode::Sequential => Stage::ALL
                .iter()
                .map(|s| s.run(&closes, &volumes))
                .collect(),
            ComputeMode::Parallel => Stage::ALL
                .as_slice()
                .par_iter()
                .map(|s| s.run(&closes, &volumes))
                .collect(),
        };

        let mut frame = IndicatorFrame::new(series.clone());
        for (column, values) in outputs.into_iter().flatten() {
            frame.insert(column, values)?;
        }

        debug!(rows = frame.len(), mode = ?self.mode, "indicator frame computed");
        Ok(frame)
    }
}

// =============================================================================
// Serializable rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    #[serde(rename = "SMA_20")]
    pub sma_20: Option<f64>,
    #[serde(rename = "EMA_20")]
    pub ema_20: Option<f64>,
    #[serde(rename = "RSI_14")]
    pub rsi_14: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: Option<f64>,
    #[serde(rename = "MACD_signal")]
    pub macd_signal: Option<f64>,
    #[serde(rename = "OBV")]
    pub obv: Option<f64>,
    #[serde(rename = "BB_upper")]
    pub bb_upper: Option<f64>,
    #[serde(rename = "BB_lower")]
    pub bb_lower: Option<f64>,
}

/// One output record: the OHLCV row, plus indicators when requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    #[serde(flatten)]
    pub point: TimePoint,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorRow>,
}
