use crate::core::error::ProviderError;
use crate::core::prediction::{PredictionProvider, PricePoint};
use crate::core::pricing::LocalTariffs;
use crate::core::tariff::PriceResolver;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

/// Offline predictions computed from the configured tariff tables.
pub struct LocalPredictionProvider {
    current: PriceResolver,
    predicted: PriceResolver,
}

impl LocalPredictionProvider {
    pub fn new(current: PriceResolver, predicted: PriceResolver) -> Self {
        Self { current, predicted }
    }
}

#[async_trait]
impl PredictionProvider for LocalPredictionProvider {
    async fn fetch_prediction(
        &self,
        date: NaiveDate,
        room_type_id: &str,
    ) -> Result<PricePoint, ProviderError> {
        let tariffs = LocalTariffs {
            current: &self.current,
            predicted: &self.predicted,
        };
        let point = tariffs
            .price_point(date, room_type_id)
            .map_err(|e| ProviderError::Transient(e.to_string()))?;
        debug!(%date, room_type = room_type_id, "Resolved local prediction");
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::core::prediction::PriceSource;

    fn provider() -> LocalPredictionProvider {
        let config = AppConfig::default();
        LocalPredictionProvider::new(config.current_resolver(), config.predicted_resolver())
    }

    #[tokio::test]
    async fn test_local_prediction() {
        let point = provider()
            .fetch_prediction(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(), "suite")
            .await
            .unwrap();

        assert_eq!(point.current_price, 350.0);
        assert_eq!(point.predicted_price, 360.0);
        assert_eq!(point.source, PriceSource::Local);
        assert!(point.details.is_none());
    }

    #[tokio::test]
    async fn test_local_prediction_unknown_room_type() {
        let result = provider()
            .fetch_prediction(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(), "cabin")
            .await;

        assert!(matches!(result, Err(ProviderError::Transient(_))));
    }
}
