//! Import proxy server.
//!
//! Browsers cannot read the comick site across origins, so front ends post
//! the user id here and the proxy performs the fetch on their behalf.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::source::{is_valid_user_id, ImportError, ItemSource};
use shared::Item;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state for the proxy handlers
pub struct ProxyState {
    pub source: Arc<dyn ItemSource>,
}

impl ProxyState {
    pub fn new(source: Arc<dyn ItemSource>) -> Self {
        Self { source }
    }
}

/// Import request body
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Kept loose so a non-string id gets the same answer as a missing one
    #[serde(rename = "userId", default)]
    pub user_id: Option<Value>,
}

/// Successful import response
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub comics: Vec<Item>,
}

/// HTTP status for an import failure
pub fn status_for(err: &ImportError) -> StatusCode {
    match err {
        ImportError::InvalidIdentifier => StatusCode::BAD_REQUEST,
        ImportError::NoFollowsFound => StatusCode::NOT_FOUND,
        ImportError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// `POST /api/comick`
pub async fn import_follows(
    State(state): State<Arc<ProxyState>>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    let user_id = match body {
        Ok(Json(ImportRequest {
            user_id: Some(Value::String(id)),
        })) if !id.trim().is_empty() => id.trim().to_string(),
        _ => return error_response(StatusCode::BAD_REQUEST, "User ID is required"),
    };

    if !is_valid_user_id(&user_id) {
        return error_response(StatusCode::BAD_REQUEST, ImportError::InvalidIdentifier.to_string());
    }

    info!(user_id = %user_id, "Fetching follows for user");
    let result = match state.source.fetch_items(&user_id).await {
        Ok(items) if items.is_empty() => Err(ImportError::NoFollowsFound),
        other => other,
    };

    match result {
        Ok(comics) => {
            info!(user_id = %user_id, count = comics.len(), "Returning parsed comics");
            Json(ImportResponse { comics }).into_response()
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Import failed");
            error_response(status_for(&e), e.to_string())
        }
    }
}

/// Build the proxy router
pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/comick", post(import_follows))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the proxy until ctrl-c
pub async fn serve(state: Arc<ProxyState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!(bind = %bind_addr, "Comick proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    info!("Comick proxy stopped");
    Ok(())
}
