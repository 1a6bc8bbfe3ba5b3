//! Core business logic abstractions

pub mod cache;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod prediction;
pub mod pricing;
pub mod tariff;

// Re-export main types for cleaner imports
pub use calendar::{DateRange, enumerate};
pub use dashboard::{DashboardData, DashboardProvider};
pub use error::{FetchError, PricingError, ProviderError};
pub use prediction::{FetchOutcome, PredictionKey, PredictionProvider, PricePoint, PriceSource};
pub use tariff::{PeakKind, PriceResolver, UnknownRoomTypePolicy};
