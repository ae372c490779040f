//! Error types for the itinerary and budget engine.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors from deriving a day schedule out of a trip's date range.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Errors from currency rate lookup and conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The provider's rate table for `base` is fresh but has no entry for
    /// `target`. This is a gap upstream, not a fetch failure.
    #[error("no rate available for {base} -> {target}")]
    RateUnavailable { base: String, target: String },

    /// The upstream fetch for `base` failed. Any previously cached entry
    /// is left untouched.
    #[error("failed to fetch rates for {base}")]
    Fetch {
        base: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors from budget ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// An expense in a foreign currency was appended without conversion.
    #[error("expense currency {expense} does not match budget currency {budget}")]
    CurrencyMismatch { expense: String, budget: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors from trip store operations.
#[derive(Error, Debug)]
pub enum TripError {
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("day index {index} out of range for trip with {len} days")]
    DayIndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    InvalidRange(#[from] ScheduleError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("failed to persist trips")]
    Persistence(#[source] anyhow::Error),
}

impl From<ConversionError> for TripError {
    fn from(err: ConversionError) -> Self {
        TripError::Ledger(LedgerError::Conversion(err))
    }
}
