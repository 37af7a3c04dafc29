// Parser-service client.
//
// Document parsing is owned by a separate service: this crate uploads raw
// workbook bytes and receives the structured extraction back. The
// `DocumentParser` trait keeps the orchestrator testable without the service.

use crate::models::{PowerCalc, RadioPlan};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("document rejected: {0}")]
    Rejected(String),
}

/// Trait for document parsing (allows mocking for tests)
#[async_trait::async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse_radio_plan(&self, bytes: &[u8]) -> Result<RadioPlan, ParserError>;
    async fn parse_power_calc(&self, bytes: &[u8]) -> Result<PowerCalc, ParserError>;
}

#[derive(Clone)]
pub struct ParserClient {
    client: reqwest::Client,
    base_url: String,
}

impl ParserClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        bytes: &[u8],
    ) -> Result<T, ParserError> {
        let url = format!("{}/api/parse/{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ParserError::Rejected(format!("{}: {}", status, message)))
        }
    }
}

#[async_trait::async_trait]
impl DocumentParser for ParserClient {
    async fn parse_radio_plan(&self, bytes: &[u8]) -> Result<RadioPlan, ParserError> {
        self.parse("radio-plan", bytes).await
    }

    async fn parse_power_calc(&self, bytes: &[u8]) -> Result<PowerCalc, ParserError> {
        self.parse("power-calc", bytes).await
    }
}
