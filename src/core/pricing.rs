//! Shapes fetch outcomes into table rows and chart points.

use super::error::Result;
use super::prediction::{FetchOutcome, PricePoint, PriceSource};
use super::tariff::PriceResolver;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// One displayable day of pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRow {
    pub date: NaiveDate,
    pub weekday: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub difference: f64,
    pub source: PriceSource,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub current_price: f64,
    pub predicted_price: f64,
}

/// Local current and predicted tariffs used to explain and fill rows.
pub struct LocalTariffs<'a> {
    pub current: &'a PriceResolver,
    pub predicted: &'a PriceResolver,
}

impl LocalTariffs<'_> {
    /// Builds a locally resolved price point for a day.
    pub fn price_point(&self, date: NaiveDate, room_type_id: &str) -> Result<PricePoint> {
        Ok(PricePoint {
            date,
            room_type_id: room_type_id.to_string(),
            current_price: self.current.resolve_local_price(date, room_type_id)?,
            predicted_price: self.predicted.resolve_local_price(date, room_type_id)?,
            source: PriceSource::Local,
            details: None,
        })
    }
}

fn row_from_point(point: &PricePoint, tariffs: &LocalTariffs<'_>) -> PricingRow {
    let reason = point
        .details
        .as_ref()
        .and_then(|d| d.description.clone())
        .unwrap_or_else(|| tariffs.current.resolve_reason(point.date, &point.room_type_id));

    PricingRow {
        date: point.date,
        weekday: point.date.format("%A").to_string(),
        current_price: point.current_price,
        predicted_price: point.predicted_price,
        difference: point.predicted_price - point.current_price,
        source: point.source,
        reason,
    }
}

/// Converts outcomes into rows in calendar order. Days without a
/// prediction are dropped, or filled from local tariffs when
/// `fill_missing` is set.
pub fn reconcile(
    outcomes: &[FetchOutcome],
    room_type_id: &str,
    tariffs: &LocalTariffs<'_>,
    fill_missing: bool,
) -> Vec<PricingRow> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FetchOutcome::Success(point) => Some(row_from_point(point, tariffs)),
            _ if fill_missing => match tariffs.price_point(outcome.date(), room_type_id) {
                Ok(point) => {
                    debug!(date = %outcome.date(), "Filling missing day from local tariffs");
                    Some(row_from_point(&point, tariffs))
                }
                Err(e) => {
                    warn!(date = %outcome.date(), error = %e, "Cannot fill missing day");
                    None
                }
            },
            _ => None,
        })
        .collect()
}

pub fn chart_points(rows: &[PricingRow]) -> Vec<ChartPoint> {
    rows.iter()
        .map(|row| ChartPoint {
            label: row.date.format("%b %d").to_string(),
            current_price: row.current_price,
            predicted_price: row.predicted_price,
        })
        .collect()
}
