//! Reverie Web Server
//!
//! Axum-based REST API for the Reverie AI diary.
//!
//! Security features:
//! - JWT session authentication on all entry and insight routes
//! - Argon2id password hashing
//! - Restrictive CORS policy
//! - Sanitized error responses (internal errors are logged, not returned)
//!
//! Startup refuses to serve traffic unless the emotion classifier is
//! reachable; the completion service is optional and degrades to a fixed
//! fallback recommendation.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use reverie_core::ai::{CompletionBackend, EmotionBackend};
use reverie_core::analysis::EntryAnalyzer;
use reverie_core::db::Database;

mod auth;
mod handlers;

pub use auth::{AuthUser, JWT_SECRET_ENV};

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify session tokens
    pub jwt_secret: String,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build configuration from environment variables
    ///
    /// `REVERIE_JWT_SECRET` is required; the server must not issue tokens
    /// signed with a default secret. `REVERIE_ALLOWED_ORIGINS` is an
    /// optional comma-separated list.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = std::env::var(JWT_SECRET_ENV)
            .map_err(|_| anyhow::anyhow!("{} must be set", JWT_SECRET_ENV))?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("{} must not be empty", JWT_SECRET_ENV);
        }

        let allowed_origins = std::env::var("REVERIE_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            jwt_secret,
            allowed_origins,
        })
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Analysis pipeline; models loaded once at bootstrap
    pub analyzer: EntryAnalyzer,
    pub config: ServerConfig,
}

/// Authentication middleware - validates the bearer session token
///
/// The token's user must still exist; a deleted account invalidates its
/// outstanding tokens.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return unauthorized("Token is missing");
    };

    let user_id = match auth::verify_token(token, &state.config.jwt_secret) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!(error = %e, path = %request.uri().path(), "Invalid session token");
            return unauthorized("Token is invalid");
        }
    };

    match state.db.get_user(user_id) {
        Ok(Some(_)) => {}
        Ok(None) => return unauthorized("User not found"),
        Err(e) => {
            error!(error = %e, "User lookup failed during authentication");
            return AppError::internal("Authentication failed").into_response();
        }
    }

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, analyzer: EntryAnalyzer, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        analyzer,
        config: config.clone(),
    });

    let protected_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Entries
        .route(
            "/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/entries/:id",
            get(handlers::get_entry).delete(handlers::delete_entry),
        )
        // Insights
        .route("/insights", get(handlers::get_insights))
        // Interactive feedback
        .route("/ai/feedback", post(handlers::interactive_feedback))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/health", get(handlers::health));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
///
/// The emotion classifier must be reachable at startup; without it every
/// entry would silently degrade to the neutral default, so boot fails
/// instead. The completion service is checked but only warned about.
pub async fn serve(
    db: Database,
    analyzer: EntryAnalyzer,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let emotions = analyzer.emotions();
    if !emotions.health_check().await {
        anyhow::bail!(
            "Emotion classifier not responding at {} (model: {}); refusing to start",
            emotions.host(),
            emotions.model()
        );
    }
    info!(
        "✅ Emotion classifier connected: {} (model: {})",
        emotions.host(),
        emotions.model()
    );

    match analyzer.recommender().client() {
        Some(completion) => {
            if completion.health_check().await {
                info!(
                    "✅ Completion service connected: {} (model: {})",
                    completion.host(),
                    completion.model()
                );
            } else {
                warn!(
                    "⚠️  Completion service configured but not responding: {} - recommendations will use the fallback text",
                    completion.host()
                );
            }
        }
        None => {
            info!("ℹ️  Completion service not configured (set COMPLETION_HOST to enable recommendations)");
        }
    }

    let app = create_router(db, analyzer, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
