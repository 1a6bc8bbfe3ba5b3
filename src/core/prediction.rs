//! Prediction abstractions and core types

use super::error::ProviderError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Local,
    Remote,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PriceSource::Local => "local",
                PriceSource::Remote => "remote",
            }
        )
    }
}

/// Extra context the prediction service returns alongside a price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub selected_ancillaries: Vec<String>,
    pub description: Option<String>,
    pub logic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub room_type_id: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub source: PriceSource,
    pub details: Option<PredictionDetails>,
}

/// Identifies one prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredictionKey {
    pub date: NaiveDate,
    pub room_type_id: String,
}

impl PredictionKey {
    pub fn new(date: NaiveDate, room_type_id: &str) -> Self {
        Self {
            date,
            room_type_id: room_type_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(PricePoint),
    NotFound(NaiveDate),
    TransientError { date: NaiveDate, reason: String },
}

impl FetchOutcome {
    pub fn date(&self) -> NaiveDate {
        match self {
            FetchOutcome::Success(point) => point.date,
            FetchOutcome::NotFound(date) => *date,
            FetchOutcome::TransientError { date, .. } => *date,
        }
    }

    pub fn price_point(&self) -> Option<&PricePoint> {
        match self {
            FetchOutcome::Success(point) => Some(point),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn fetch_prediction(
        &self,
        date: NaiveDate,
        room_type_id: &str,
    ) -> Result<PricePoint, ProviderError>;
}
