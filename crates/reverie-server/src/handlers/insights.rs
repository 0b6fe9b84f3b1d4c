//! Insight and feedback handlers

use std::str::FromStr;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};
use reverie_core::ai::{CompletionBackend, EmotionBackend};
use reverie_core::insights::{InsightGenerator, InsightReport, TrendAggregator, TrendSample};
use reverie_core::models::{Emotion, Mood};

/// GET /api/insights - Trends and observations over the user's history
///
/// Trend signals are recomputed from raw entry content on every call; the
/// stored analysis of the newest entry feeds the observation rules. A user
/// with no entries gets `null` rather than an error.
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Option<InsightReport>>, AppError> {
    let entries = state.db.list_entries_chronological(auth_user.user_id)?;
    let Some(latest) = entries.last() else {
        return Ok(Json(None));
    };

    let samples: Vec<TrendSample> = entries
        .iter()
        .map(|e| TrendSample {
            content: e.content.clone(),
            recorded_at: e.created_at,
        })
        .collect();

    let aggregator = TrendAggregator::new(&state.analyzer);
    let Some(trend) = aggregator.summarize(&samples).await? else {
        return Ok(Json(None));
    };

    let report = InsightGenerator::report(trend, latest.analysis.clone());
    Ok(Json(Some(report)))
}

/// Request body for interactive feedback
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub emotion: String,
}

/// Response body for interactive feedback
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// POST /api/ai/feedback - Regenerate advice for an entry on demand
pub async fn interactive_feedback(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    if body.entry.trim().is_empty() || body.mood.trim().is_empty() || body.emotion.trim().is_empty()
    {
        return Err(AppError::bad_request("Missing entry, mood, or emotion"));
    }

    let mood = Mood::from_str(&body.mood)
        .map_err(|_| AppError::bad_request("Unknown mood"))?;
    let emotion = Emotion::from_label_or_neutral(&body.emotion);

    let feedback = state
        .analyzer
        .recommender()
        .generate(&body.entry, mood, emotion)
        .await;

    Ok(Json(FeedbackResponse { feedback }))
}

/// Availability of one model backend
#[derive(Debug, Serialize)]
pub struct BackendStatus {
    pub host: String,
    pub model: String,
    pub available: bool,
}

/// Response body for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub emotion: BackendStatus,
    pub completion: Option<BackendStatus>,
}

/// GET /api/health - Model backend availability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let emotions = state.analyzer.emotions();
    let emotion = BackendStatus {
        host: emotions.host().to_string(),
        model: emotions.model().to_string(),
        available: emotions.health_check().await,
    };

    let completion = match state.analyzer.recommender().client() {
        Some(client) => Some(BackendStatus {
            host: client.host().to_string(),
            model: client.model().to_string(),
            available: client.health_check().await,
        }),
        None => None,
    };

    let status = if emotion.available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        emotion,
        completion,
    })
}
