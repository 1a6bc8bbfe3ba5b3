use crate::core::error::ProviderError;
use crate::core::prediction::{PredictionDetails, PredictionProvider, PricePoint, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    date: Option<String>,
    current_price: f64,
    optimized_price: f64,
    room_type: Option<String>,
    #[serde(default)]
    selected_ancillaries: Vec<String>,
    description: Option<String>,
    logic: Option<String>,
}

/// Client for the `get_prediction` endpoint of the pricing service.
pub struct PredictionApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl PredictionApiProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().user_agent("hrm/1.0").build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn prediction_url(&self, date: NaiveDate, room_type_id: &str) -> Result<Url, ProviderError> {
        let date = date.format("%Y-%m-%d").to_string();
        Url::parse_with_params(
            &format!("{}/get_prediction", self.base_url),
            &[("date", date.as_str()), ("room_type", room_type_id)],
        )
        .map_err(|e| ProviderError::Transient(format!("Invalid prediction URL: {e}")))
    }
}

#[async_trait]
impl PredictionProvider for PredictionApiProvider {
    #[instrument(
        name = "PredictionFetch",
        skip(self),
        fields(date = %date, room_type = %room_type_id)
    )]
    async fn fetch_prediction(
        &self,
        date: NaiveDate,
        room_type_id: &str,
    ) -> Result<PricePoint, ProviderError> {
        let url = self.prediction_url(date, room_type_id)?;
        debug!("Requesting prediction from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("No prediction available");
                return Err(ProviderError::NotFound);
            }
            status if !status.is_success() => {
                debug!(%status, "Prediction service returned an error");
                return Err(ProviderError::Transient(format!("HTTP {status}")));
            }
            _ => {}
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transient(format!("Failed to read response: {e}")))?;

        let prediction: PredictionResponse = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse prediction response"
                );
                return Err(ProviderError::Transient(format!(
                    "Failed to parse prediction response: {e}"
                )));
            }
        };

        if let Some(returned) = prediction.date.as_deref() {
            if returned != date.format("%Y-%m-%d").to_string() {
                warn!(returned, "Prediction date differs from requested date");
            }
        }
        if let Some(returned) = prediction.room_type.as_deref() {
            if returned != room_type_id {
                warn!(returned, "Prediction room type differs from requested room type");
            }
        }

        Ok(PricePoint {
            date,
            room_type_id: room_type_id.to_string(),
            current_price: prediction.current_price,
            predicted_price: prediction.optimized_price,
            source: PriceSource::Remote,
            details: Some(PredictionDetails {
                selected_ancillaries: prediction.selected_ancillaries,
                description: prediction.description,
                logic: prediction.logic,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "date": "2025-03-01",
        "current_price": 150,
        "optimized_price": 172.5,
        "room_type": "standard",
        "selected_ancillaries": ["breakfast", "late_checkout"],
        "description": "Weekend demand above trend",
        "logic": "occupancy_forecast * competitor_index"
    }"#;

    async fn create_mock_server(date: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_prediction"))
            .and(query_param("date", date))
            .and(query_param("room_type", "standard"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_prediction() {
        let mock_server = create_mock_server("2025-03-01", 200, MOCK_JSON).await;
        let provider = PredictionApiProvider::new(&mock_server.uri()).unwrap();

        let point = provider
            .fetch_prediction(day(2025, 3, 1), "standard")
            .await
            .unwrap();

        assert_eq!(point.date, day(2025, 3, 1));
        assert_eq!(point.room_type_id, "standard");
        assert_eq!(point.current_price, 150.0);
        assert_eq!(point.predicted_price, 172.5);
        assert_eq!(point.source, PriceSource::Remote);
        let details = point.details.unwrap();
        assert_eq!(details.selected_ancillaries, vec!["breakfast", "late_checkout"]);
        assert_eq!(details.description.as_deref(), Some("Weekend demand above trend"));
    }

    #[tokio::test]
    async fn test_fetch_prediction_minimal_body() {
        let body = r#"{"current_price": 120, "optimized_price": 118}"#;
        let mock_server = create_mock_server("2025-03-04", 200, body).await;
        let provider = PredictionApiProvider::new(&mock_server.uri()).unwrap();

        let point = provider
            .fetch_prediction(day(2025, 3, 4), "standard")
            .await
            .unwrap();

        assert_eq!(point.predicted_price, 118.0);
        assert_eq!(point.details.unwrap(), PredictionDetails::default());
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = create_mock_server("2025-03-02", 404, "").await;
        let provider = PredictionApiProvider::new(&mock_server.uri()).unwrap();

        let result = provider.fetch_prediction(day(2025, 3, 2), "standard").await;
        assert_eq!(result, Err(ProviderError::NotFound));
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let mock_server = create_mock_server("2025-03-02", 503, "busy").await;
        let provider = PredictionApiProvider::new(&mock_server.uri()).unwrap();

        let result = provider.fetch_prediction(day(2025, 3, 2), "standard").await;
        assert!(matches!(result, Err(ProviderError::Transient(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transient() {
        let mock_server = create_mock_server("2025-03-01", 200, "<html>").await;
        let provider = PredictionApiProvider::new(&mock_server.uri()).unwrap();

        let result = provider.fetch_prediction(day(2025, 3, 1), "standard").await;
        assert!(matches!(result, Err(ProviderError::Transient(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transient() {
        // Nothing listens on the discard port
        let provider = PredictionApiProvider::new("http://127.0.0.1:9").unwrap();

        let result = provider.fetch_prediction(day(2025, 3, 1), "standard").await;
        assert!(matches!(result, Err(ProviderError::Transient(_))));
    }
}
