//! Entry handlers
//!
//! Entry creation runs the full analysis pipeline synchronously inside the
//! request. Validation happens before any model call; a sentiment failure
//! fails the whole request, while emotion and recommendation failures have
//! already been degraded inside the pipeline.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use reverie_core::models::{Entry, NewEntry};

/// Request body for entry creation
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// POST /api/entries - Create and analyze an entry
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    // Rejected before any model call
    if body.content.trim().is_empty() {
        return Err(AppError::bad_request("Content is required"));
    }

    let analysis = state.analyzer.analyze(&body.content).await?;

    let new_entry = NewEntry {
        title: body.title,
        content: body.content,
    };
    let entry = state
        .db
        .insert_entry(auth_user.user_id, &new_entry, &analysis)?;

    info!(
        entry_id = entry.id,
        user_id = auth_user.user_id,
        mood = %entry.analysis.emotion.mood,
        "Entry created"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/entries - List the user's entries, newest first
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = state.db.list_entries(auth_user.user_id)?;
    Ok(Json(entries))
}

/// GET /api/entries/:id - Fetch one entry
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Entry>, AppError> {
    let entry = state
        .db
        .get_entry(id, auth_user.user_id)?
        .ok_or_else(|| AppError::not_found("Entry not found"))?;
    Ok(Json(entry))
}

/// DELETE /api/entries/:id - Delete one entry
///
/// An entry owned by another user is indistinguishable from a missing one.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    let deleted = state.db.delete_entry(id, auth_user.user_id)?;
    if deleted == 0 {
        return Err(AppError::not_found("Entry not found"));
    }

    info!(entry_id = id, user_id = auth_user.user_id, "Entry deleted");
    Ok(Json(SuccessResponse { success: true }))
}
