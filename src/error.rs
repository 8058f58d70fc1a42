// =============================================================================
// Engine errors
// =============================================================================
//
// Only structural problems with the input surface as errors. Numeric edge
// cases inside the stages (zero average loss, short series) are absorbed by
// the stages themselves.

use thiserror::Error;

/// Why a particular input row was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    #[error("timestamp is not strictly after the previous row")]
    NonIncreasingTimestamp,

    #[error("close price is missing")]
    MissingClose,

    #[error("volume is missing")]
    MissingVolume,

    #[error("volume is negative: {0}")]
    NegativeVolume(f64),

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
}

/// Failures raised while ingesting a series or assembling its indicator frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Zero-length input. Callers report this as "no data available".
    #[error("no data available: the input series is empty")]
    EmptySeries,

    #[error("malformed series at row {index}: {reason}")]
    MalformedSeries {
        index: usize,
        reason: MalformedReason,
    },

    /// A stage produced a column that does not line up with the series.
    #[error("column {column} has {actual} values, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl SeriesError {
    pub(crate) fn malformed(index: usize, reason: MalformedReason) -> Self {
        Self::MalformedSeries { index, reason }
    }
}
