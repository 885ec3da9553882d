//! Vision-language model service HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{
    EmbeddingResponse, HealthResponse, ImageEmbeddingRequest, TextEmbeddingRequest, VqaRequest,
    VqaResponse,
};

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SCENELENS_ML_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("SCENELENS_ML_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("SCENELENS_ML_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the vision-language model service.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    pub fn config(&self) -> &MlClientConfig {
        &self.config
    }

    /// Check if ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Embed a text query.
    pub async fn embed_text(&self, text: &str) -> MlResult<Vec<f32>> {
        let request = TextEmbeddingRequest {
            text: text.to_string(),
        };
        let response: EmbeddingResponse = self.post("/embed/text", &request).await?;
        Self::check_embedding(response.embedding)
    }

    /// Embed a base64-encoded JPEG frame.
    pub async fn embed_image(&self, image_base64: &str) -> MlResult<Vec<f32>> {
        let request = ImageEmbeddingRequest {
            image_base64: image_base64.to_string(),
        };
        let response: EmbeddingResponse = self.post("/embed/image", &request).await?;
        Self::check_embedding(response.embedding)
    }

    /// Ask a free-text question about a base64-encoded JPEG frame.
    pub async fn ask(&self, image_base64: &str, question: &str) -> MlResult<String> {
        let request = VqaRequest {
            image_base64: image_base64.to_string(),
            question: question.to_string(),
        };
        let response: VqaResponse = self.post("/vqa", &request).await?;
        Ok(response.answer)
    }

    fn check_embedding(embedding: Vec<f32>) -> MlResult<Vec<f32>> {
        if embedding.is_empty() {
            return Err(MlError::InvalidResponse("empty embedding".to_string()));
        }
        Ok(embedding)
    }

    /// POST a JSON body and decode the JSON reply, retrying transient failures.
    async fn post<B, T>(&self, path: &str, body: &B) -> MlResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);

        debug!("Sending ML request to {}", url);

        self.with_retry(|| async {
            let response = self
                .http
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;

            let status = response.status();
            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(MlError::ServiceUnavailable(format!("{} returned {}", path, status)));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(MlError::RequestFailed(format!(
                    "ML service returned {}: {}",
                    status, body
                )));
            }

            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        })
        .await
    }

    fn map_send_error(&self, error: reqwest::Error) -> MlError {
        if error.is_timeout() {
            MlError::Timeout(self.config.timeout.as_secs())
        } else {
            MlError::Network(error)
        }
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "ML request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(MlError::RequestFailed("Unknown error".to_string())))
    }
}
