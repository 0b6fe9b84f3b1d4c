//! OpenAI-compatible completion backend
//!
//! Works with any server that implements the OpenAI chat completions API.
//! Used for generating self-care recommendations; this is the only
//! network-bound, seconds-scale step in the pipeline, so requests carry an
//! explicit timeout and callers treat expiry like any other failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::mock::MockCompletionBackend;

/// Request timeout for completion calls; expiry is a recoverable failure
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_COMPLETION_MODEL: &str = "gpt-4";

/// Sampling temperature for recommendation completions
const TEMPERATURE: f64 = 0.7;

/// Token budget for recommendation completions
const MAX_TOKENS: u32 = 300;

/// Trait defining the interface for completion backends
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request a short completion for a system + user message pair
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// OpenAI-compatible backend
///
/// Works with any server implementing the `/v1/chat/completions` API.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
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
    /// Required: `COMPLETION_HOST`
    /// Optional: `COMPLETION_MODEL` (default: gpt-4), `COMPLETION_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("COMPLETION_HOST").ok()?;
        let model = std::env::var("COMPLETION_MODEL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string());
        let mut backend = Self::new(&host, &model);
        backend.api_key = std::env::var("COMPLETION_API_KEY").ok();
        Some(backend)
    }
}

/// Request to the chat completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[async_trait]
impl CompletionBackend for OpenAICompatibleBackend {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Completion API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;
        debug!(choices = chat_response.choices.len(), "Completion response");

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| Error::InvalidData("No choices in completion response".into()))
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        match req_builder.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// Concrete completion client enum
#[derive(Clone)]
pub enum CompletionClient {
    /// OpenAI-compatible backend (hosted API or local server)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockCompletionBackend),
}

impl CompletionClient {
    /// Create a completion client from environment variables
    ///
    /// Returns None if `COMPLETION_HOST` is not set; the recommendation
    /// generator then degrades to its fixed fallback text.
    pub fn from_env() -> Option<Self> {
        OpenAICompatibleBackend::from_env().map(CompletionClient::OpenAICompatible)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        CompletionClient::Mock(MockCompletionBackend::new())
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        match self {
            CompletionClient::OpenAICompatible(b) => b.complete(system, prompt).await,
            CompletionClient::Mock(b) => b.complete(system, prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            CompletionClient::OpenAICompatible(b) => b.health_check().await,
            CompletionClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            CompletionClient::OpenAICompatible(b) => b.model(),
            CompletionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            CompletionClient::OpenAICompatible(b) => b.host(),
            CompletionClient::Mock(b) => b.host(),
        }
    }
}
