//! Revenue, occupancy and demand aggregates for the summary view.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub actual_revenue: f64,
    pub predicted_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyPoint {
    pub month: String,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub season: String,
    pub demand: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub revenue_comparison: Vec<RevenuePoint>,
    #[serde(default)]
    pub occupancy_trends: Vec<OccupancyPoint>,
    #[serde(default)]
    pub seasonal_demand: Vec<DemandPoint>,
}

impl Default for DashboardData {
    fn default() -> Self {
        let months = ["Jan", "Feb", "Mar", "Apr", "May"];
        let revenue = [
            (20000.0, 25000.0),
            (18000.0, 23000.0),
            (22000.0, 27000.0),
            (24000.0, 28000.0),
            (21000.0, 26000.0),
        ];
        let occupancy = [75.0, 80.0, 85.0, 78.0, 82.0];
        let demand = [
            ("Winter", 30.0),
            ("Spring", 50.0),
            ("Summer", 90.0),
            ("Autumn", 60.0),
        ];

        Self {
            revenue_comparison: months
                .iter()
                .zip(revenue)
                .map(|(month, (actual, predicted))| RevenuePoint {
                    month: month.to_string(),
                    actual_revenue: actual,
                    predicted_revenue: predicted,
                })
                .collect(),
            occupancy_trends: months
                .iter()
                .zip(occupancy)
                .map(|(month, rate)| OccupancyPoint {
                    month: month.to_string(),
                    occupancy_rate: rate,
                })
                .collect(),
            seasonal_demand: demand
                .iter()
                .map(|(season, demand)| DemandPoint {
                    season: season.to_string(),
                    demand: *demand,
                })
                .collect(),
        }
    }
}

impl DashboardData {
    pub fn total_actual_revenue(&self) -> f64 {
        self.revenue_comparison.iter().map(|r| r.actual_revenue).sum()
    }

    pub fn total_predicted_revenue(&self) -> f64 {
        self.revenue_comparison
            .iter()
            .map(|r| r.predicted_revenue)
            .sum()
    }

    /// Predicted over actual revenue, in percent. `None` without actuals.
    pub fn revenue_uplift_pct(&self) -> Option<f64> {
        let actual = self.total_actual_revenue();
        if actual <= 0.0 {
            return None;
        }
        Some((self.total_predicted_revenue() - actual) / actual * 100.0)
    }

    pub fn average_occupancy(&self) -> Option<f64> {
        if self.occupancy_trends.is_empty() {
            return None;
        }
        let total: f64 = self.occupancy_trends.iter().map(|o| o.occupancy_rate).sum();
        Some(total / self.occupancy_trends.len() as f64)
    }

    pub fn peak_season(&self) -> Option<&DemandPoint> {
        self.seasonal_demand
            .iter()
            .max_by(|a, b| a.demand.total_cmp(&b.demand))
    }
}

#[async_trait]
pub trait DashboardProvider: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<DashboardData>;
}

/// Fetches dashboard data, substituting the built-in dataset on any failure.
pub async fn load_or_default(provider: &(dyn DashboardProvider + Send + Sync)) -> DashboardData {
    match provider.fetch_dashboard().await {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "Dashboard data unavailable, using defaults");
            DashboardData::default()
        }
    }
}
