//! Hosted emotion classifier backend
//!
//! HTTP client for a hosted text-classification endpoint serving a fixed
//! 28-category emotion model. The endpoint contract is the common hosted
//! inference shape: POST {host}/models/{model} with `{"inputs": text}`,
//! response `[[{"label": ..., "score": ...}, ...]]` covering every category.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Emotion, EmotionScore};

use super::mock::MockEmotionBackend;

/// Request timeout for classification calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const DEFAULT_EMOTION_MODEL: &str = "SamLowe/roberta-base-go_emotions";

/// Trait defining the interface for emotion classification backends
///
/// Backends should be Send + Sync to allow use across async tasks, and
/// safely reusable for concurrent read-only inference calls.
#[async_trait]
pub trait EmotionBackend: Send + Sync {
    /// Score every emotion category for one text
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Hosted emotion classifier over HTTP
#[derive(Clone)]
pub struct HostedEmotionBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HostedEmotionBackend {
    /// Create a new hosted backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Create from environment variables
    ///
    /// Required: `EMOTION_HOST`
    /// Optional: `EMOTION_MODEL`, `EMOTION_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("EMOTION_HOST").ok()?;
        let model =
            std::env::var("EMOTION_MODEL").unwrap_or_else(|_| DEFAULT_EMOTION_MODEL.to_string());
        let mut backend = Self::new(&host, &model);
        backend.api_key = std::env::var("EMOTION_API_KEY").ok();
        Some(backend)
    }
}

/// Request to the classification endpoint
#[derive(Debug, Serialize)]
struct ClassifyRequest {
    inputs: String,
}

/// One scored label in the classification response
#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[async_trait]
impl EmotionBackend for HostedEmotionBackend {
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        let request = ClassifyRequest {
            inputs: text.to_string(),
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ModelUnavailable(format!(
                "Emotion classifier error {}: {}",
                status, body
            )));
        }

        // The hosted endpoint wraps results in one outer array per input
        let batches: Vec<Vec<LabelScore>> = response.json().await?;
        let labels = batches
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidData("Empty classification response".into()))?;

        debug!(count = labels.len(), "Emotion classifier response");

        let scores = labels
            .into_iter()
            .map(|l| {
                let emotion = Emotion::from_label(&l.label).unwrap_or_else(|| {
                    warn!(label = %l.label, "Unknown emotion label, treating as neutral");
                    Emotion::Neutral
                });
                EmotionScore {
                    emotion,
                    score: l.score,
                }
            })
            .collect();

        Ok(scores)
    }

    async fn health_check(&self) -> bool {
        self.classify("ok").await.is_ok()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// Concrete emotion client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum EmotionClient {
    /// Hosted classifier (HTTP API)
    Hosted(HostedEmotionBackend),
    /// Mock backend for testing
    Mock(MockEmotionBackend),
}

impl EmotionClient {
    /// Create an emotion client from environment variables
    ///
    /// Checks `EMOTION_BACKEND` to determine which backend to use:
    /// - `hosted` (default): uses EMOTION_HOST and EMOTION_MODEL
    /// - `mock`: creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("EMOTION_BACKEND").unwrap_or_else(|_| "hosted".to_string());

        match backend.to_lowercase().as_str() {
            "hosted" => HostedEmotionBackend::from_env().map(EmotionClient::Hosted),
            "mock" => Some(EmotionClient::Mock(MockEmotionBackend::new())),
            _ => {
                warn!(backend = %backend, "Unknown EMOTION_BACKEND, falling back to hosted");
                HostedEmotionBackend::from_env().map(EmotionClient::Hosted)
            }
        }
    }

    /// Create a hosted backend directly
    pub fn hosted(host: &str, model: &str) -> Self {
        EmotionClient::Hosted(HostedEmotionBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        EmotionClient::Mock(MockEmotionBackend::new())
    }
}

#[async_trait]
impl EmotionBackend for EmotionClient {
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        match self {
            EmotionClient::Hosted(b) => b.classify(text).await,
            EmotionClient::Mock(b) => b.classify(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            EmotionClient::Hosted(b) => b.health_check().await,
            EmotionClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            EmotionClient::Hosted(b) => b.model(),
            EmotionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            EmotionClient::Hosted(b) => b.host(),
            EmotionClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_client_mock() {
        let client = EmotionClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = EmotionClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_classify_covers_all_categories() {
        let client = EmotionClient::mock();
        let scores = client.classify("What a wonderful day").await.unwrap();
        assert_eq!(scores.len(), crate::models::Emotion::ALL.len());
    }
}
