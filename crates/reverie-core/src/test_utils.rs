//! Test utilities for reverie-core
//!
//! This module provides testing infrastructure including a mock model server
//! that fakes both hosted endpoints (emotion classification and chat
//! completions) for development and integration tests.

use axum::{
    extract::{Json, Path},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::ai::MockEmotionBackend;

/// Mock model server for testing and development
pub struct MockModelServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockModelServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/models/*model", post(handle_classify))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/models", get(handle_models));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockModelServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    inputs: String,
}

#[derive(Debug, Serialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Classification endpoint: same keyword heuristic as the mock backend,
/// serialized in the hosted wire shape (one batch per input)
async fn handle_classify(
    Path(_model): Path<String>,
    Json(request): Json<ClassifyRequest>,
) -> Json<Vec<Vec<LabelScore>>> {
    let scores = MockEmotionBackend::scores_for(&request.inputs)
        .into_iter()
        .map(|s| LabelScore {
            label: s.emotion.as_str().to_string(),
            score: s.score,
        })
        .collect();
    Json(vec![scores])
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    #[allow(dead_code)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Serialize)]
struct AssistantMessage {
    role: String,
    content: String,
}

/// Chat completions endpoint: canned recommendation text
async fn handle_chat(Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    Json(ChatResponse {
        model: request.model,
        choices: vec![ChatChoice {
            message: AssistantMessage {
                role: "assistant".to_string(),
                content: "- You had a lot on your mind today.\n\
                          - Take a short walk and get some fresh air.\n\
                          - Write down one thing you are grateful for.\n\
                          - Be gentle with yourself this evening."
                    .to_string(),
            },
        }],
    })
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    id: String,
}

/// Model listing endpoint (health checks)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        data: vec![ModelInfo {
            id: "gpt-4".to_string(),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{
        CompletionBackend, EmotionBackend, HostedEmotionBackend, OpenAICompatibleBackend,
    };
    use crate::models::{Emotion, EmotionAnalysis};

    #[tokio::test]
    async fn test_hosted_emotion_backend_against_mock_server() {
        let server = MockModelServer::start().await;
        let backend = HostedEmotionBackend::new(&server.url(), "test-emotions");

        assert!(backend.health_check().await);

        let scores = backend
            .classify("Thank you for a wonderful surprise")
            .await
            .unwrap();
        assert_eq!(scores.len(), Emotion::ALL.len());

        let analysis = EmotionAnalysis::from_scores(scores);
        assert_eq!(analysis.primary_emotion, Emotion::Gratitude);
    }

    #[tokio::test]
    async fn test_hosted_completion_backend_against_mock_server() {
        let server = MockModelServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-4");

        assert!(backend.health_check().await);

        let reply = backend
            .complete("You are empathetic.", "Say something kind.")
            .await
            .unwrap();
        assert!(reply.contains("gentle"));
    }

    #[tokio::test]
    async fn test_stopped_server_is_unavailable() {
        let mut server = MockModelServer::start().await;
        let url = server.url();
        server.stop();
        // Give the listener a moment to close
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let backend = HostedEmotionBackend::new(&url, "test-emotions");
        assert!(backend.classify("anything").await.is_err());
        assert!(!backend.health_check().await);
    }
}
