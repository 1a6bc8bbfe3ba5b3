//! Typed errors for pricing resolution and range fetching

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while resolving local prices or enumerating dates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Unknown room type: {0}")]
    UnknownRoomType(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Errors returned by a range fetch as a whole. Per-day failures are
/// reported as outcomes instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A newer fetch started before this one finished.
    #[error("Fetch superseded by a newer request")]
    Superseded,
}

/// Result of a single prediction lookup that did not produce a price.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No prediction available")]
    NotFound,

    #[error("Prediction request failed: {0}")]
    Transient(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;
