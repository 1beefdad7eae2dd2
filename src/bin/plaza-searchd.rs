//! plaza-searchd: HTTP front-end for plaza-search.
//!
//! **Search:**
//! - `GET /v1/search?search=<text>&filters=<json>`: ranked subjects as
//!   SPARQL-results-JSON; an empty `search` lists every matching subject
//!
//! **Health:**
//! - `GET /health`: server status
//!
//! Errors are returned as `{"detail": "...", "source": "..."}`.
//!
//! Build and run: `cargo run --features server --bin plaza-searchd`

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use plaza_search::config::SearchConfig;
use plaza_search::engine::SearchEngine;
use plaza_search::error::{ConfigError, PlazaError, SearchError, SourceError};
use plaza_search::rank::RankingConfig;
use plaza_search::response::SubjectBindings;
use plaza_search::source::parse_filters;

// ── Server state ──────────────────────────────────────────────────────────

struct ServerState {
    config: SearchConfig,
    ranking: RankingConfig,
}

// ── Errors ────────────────────────────────────────────────────────────────

struct ApiError {
    status: StatusCode,
    detail: String,
    source: &'static str,
}

impl ApiError {
    fn handled(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            source: "api_handled_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
    source: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: &self.detail,
            source: self.source,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<PlazaError> for ApiError {
    fn from(err: PlazaError) -> Self {
        match &err {
            PlazaError::Source(SourceError::InvalidFilters { .. }) => {
                Self::handled(StatusCode::BAD_REQUEST, format!("Query Parameter Error: {err}"))
            }
            PlazaError::Source(SourceError::Status { .. } | SourceError::Transport { .. }) => {
                Self::handled(StatusCode::BAD_GATEWAY, format!("Data Fetching Error: {err}"))
            }
            PlazaError::Config(ConfigError::MissingEndpoint) => Self::handled(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Configuration Error: {err}"),
            ),
            PlazaError::Search(SearchError::MalformedInput { .. }) => Self::handled(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Data Parsing Error: {err}"),
            ),
            _ => {
                tracing::error!(error = %err, "unexpected search failure");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: "An internal server error occurred.".into(),
                    source: "unhandled_system_error",
                }
            }
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    endpoint_configured: bool,
}

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoint_configured: state.config.graph.endpoint.is_some(),
    })
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    search: String,
    filters: Option<String>,
}

async fn search_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SubjectBindings>, ApiError> {
    let filters =
        parse_filters(params.filters.as_deref().unwrap_or_default()).map_err(PlazaError::from)?;
    let source = state.config.graph_source().map_err(PlazaError::from)?;
    let ranking = state.ranking.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        SearchEngine::new(source, ranking).search(&params.search, &filters)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "search task failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "An internal server error occurred.".into(),
            source: "unhandled_system_error",
        }
    })??;

    Ok(Json(SubjectBindings::from_subjects(outcome.subjects())))
}

// ── Main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("PLAZA_SERVER_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PLAZA_SERVER_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("{bind}:{port}");
    let config_path = std::env::var_os("PLAZA_SEARCH_CONFIG").map(PathBuf::from);

    let config = SearchConfig::resolve(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!("failed to load configuration: {e}");
        std::process::exit(1);
    });
    let ranking = config.ranking_config().unwrap_or_else(|e| {
        tracing::error!("invalid ranking configuration: {e}");
        std::process::exit(1);
    });
    if config.graph.endpoint.is_none() {
        tracing::warn!("no graph store endpoint configured; searches will return 503");
    }

    let state = Arc::new(ServerState { config, ranking });

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/search", get(search_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("plaza-searchd listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        });

    // Serve with graceful shutdown on SIGTERM/SIGINT.
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let ctrl_c = tokio::signal::ctrl_c();
            #[cfg(unix)]
            {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        tokio::select! {
                            _ = ctrl_c => {},
                            _ = sigterm.recv() => {},
                        }
                    }
                    Err(_) => {
                        ctrl_c.await.ok();
                    }
                }
            }
            #[cfg(not(unix))]
            {
                ctrl_c.await.ok();
            }
            tracing::info!("plaza-searchd shutting down");
        })
        .await;

    if let Err(e) = served {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
