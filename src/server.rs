//! HTTP server - REST API for the browser client.
//!
//! Routes:
//! - `GET /api/characters` - all characters
//! - `GET /api/character/:id` - one character with its system prompt
//! - `GET /api/search?q=` - substring search
//!
//! Anything else is served from the static directory.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path as UrlPath, RawQuery, State},
    http::{Method, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use url::form_urlencoded;

use crate::catalog::{CharacterDetail, CharacterSummary};
use crate::config::Config;
use crate::error::CatalogError;
use crate::service::{CatalogService, Fetched};

/// Shared application state.
#[derive(Clone)]
struct AppState {
    catalog: CatalogService,
}

/// API response wrapper: `{ success, data?, error?, details?, cached? }`
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cached: Option<bool>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            cached: None,
        }
    }

    fn fetched(fetched: Fetched<T>) -> Self {
        Self {
            cached: Some(fetched.cached),
            ..Self::ok(fetched.data)
        }
    }
}

/// Failure envelope returned from handlers.
struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        match &err {
            CatalogError::NotFound { id } => warn!("Character {} not found", id),
            other => error!("Catalog request failed: {}", other),
        }

        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
            details: err.details().cloned(),
            cached: None,
        };
        (err.status_code(), Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/characters
async fn list_handler(State(state): State<AppState>) -> ApiResult<Arc<Vec<CharacterSummary>>> {
    let list = state.catalog.list_characters().await?;
    Ok(Json(ApiResponse::fetched(list)))
}

/// GET /api/character/:id
async fn detail_handler(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Arc<CharacterDetail>> {
    let detail = state.catalog.character_detail(&id).await?;
    Ok(Json(ApiResponse::fetched(detail)))
}

/// GET /api/search?q={query}
async fn search_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Vec<CharacterSummary>> {
    let term = search_term(query.as_deref());
    let results = state.catalog.search(&term).await?;
    Ok(Json(ApiResponse::ok(results)))
}

/// First `q` value of the query string; missing means empty.
fn search_term(query: Option<&str>) -> String {
    query
        .and_then(|raw| {
            form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "q")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the web server router
pub fn create_router(catalog: CatalogService, static_dir: &Path) -> Router {
    let state = AppState { catalog };

    Router::new()
        .route("/api/characters", get(list_handler))
        .route("/api/character/:id", get(detail_handler))
        .route("/api/search", get(search_handler))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

/// Start the web server and run until Ctrl+C / SIGTERM.
pub async fn serve(config: &Config, catalog: CatalogService) -> anyhow::Result<()> {
    let app = create_router(catalog, &config.static_dir);
    let addr = SocketAddr::new(config.host, config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🚀 Server running on http://{}", addr);
    info!("📡 API endpoints:");
    info!("   GET /api/characters - Get all characters");
    info!("   GET /api/character/:id - Get character details");
    info!("   GET /api/search?q=query - Search characters");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
