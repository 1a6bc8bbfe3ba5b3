use super::util::with_retry;
use crate::core::dashboard::{DashboardData, DashboardProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error};

/// Client for the `get_dashboard_data` endpoint.
pub struct DashboardApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    delay_ms: u64,
}

impl DashboardApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("hrm/1.0").build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: 2,
            delay_ms: 300,
        })
    }

    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.delay_ms = delay_ms;
        self
    }
}

#[async_trait]
impl DashboardProvider for DashboardApiProvider {
    async fn fetch_dashboard(&self) -> Result<DashboardData> {
        let url = format!("{}/get_dashboard_data", self.base_url);
        debug!("Requesting dashboard data from {}", url);

        let response = with_retry(
            || async { self.client.get(&url).send().await?.error_for_status() },
            self.retries,
            self.delay_ms,
        )
        .await
        .context("Dashboard request failed")?;

        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        match serde_json::from_str(&response_text) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse dashboard response"
                );
                Err(e).context("Failed to parse dashboard response")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::load_or_default;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "revenue_comparison": [
            {"month": "Jun", "actual_revenue": 30000, "predicted_revenue": 33000}
        ],
        "occupancy_trends": [
            {"month": "Jun", "occupancy_rate": 91}
        ]
    }"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_dashboard_data"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_fetch_dashboard() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let provider = DashboardApiProvider::new(&mock_server.uri()).unwrap();

        let data = provider.fetch_dashboard().await.unwrap();

        assert_eq!(data.revenue_comparison.len(), 1);
        assert_eq!(data.revenue_comparison[0].month, "Jun");
        assert_eq!(data.occupancy_trends[0].occupancy_rate, 91.0);
        assert!(data.seasonal_demand.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_defaults() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_dashboard_data"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;
        let provider = DashboardApiProvider::new(&mock_server.uri())
            .unwrap()
            .with_retries(2, 10);

        assert_eq!(load_or_default(&provider).await, DashboardData::default());
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back_to_defaults() {
        let mock_server = create_mock_server(200, "not json").await;
        let provider = DashboardApiProvider::new(&mock_server.uri()).unwrap();

        assert_eq!(load_or_default(&provider).await, DashboardData::default());
    }
}
