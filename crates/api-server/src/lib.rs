use analysis_core::AnalysisError;
use analysis_orchestrator::{
    AnalysisFailure, AnalysisOrchestrator, FailureReason, OrchestratorConfig, ScanReport,
};
use anyhow::Context;
use asset_registry::AssetRegistry;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use yahoo_client::YahooClient;

mod analysis_routes;
mod asset_routes;
pub mod config;
pub mod request_id;
mod scan_routes;

pub use config::ServerConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    /// Result set of the most recent `POST /api/scan`
    pub last_scan: Arc<RwLock<Option<ScanReport>>>,
    pub default_min_score: f64,
}

impl AppState {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, default_min_score: f64) -> Self {
        Self {
            orchestrator,
            last_scan: Arc::new(RwLock::new(None)),
            default_min_score,
        }
    }
}

/// Envelope for every JSON response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error rendered as an `ApiResponse` with a matching status code
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
    }
}

impl From<AnalysisFailure> for AppError {
    fn from(failure: AnalysisFailure) -> Self {
        let status = match failure.reason {
            FailureReason::UnknownTicker | FailureReason::NoPriceData => StatusCode::NOT_FOUND,
            FailureReason::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FailureReason::Provider { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, failure.to_string())
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let status = match err {
            AnalysisError::UnknownTicker(_) => StatusCode::NOT_FOUND,
            AnalysisError::InvalidData(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Provider(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(asset_routes::asset_routes())
        .merge(analysis_routes::analysis_routes())
        .merge(scan_routes::scan_routes())
        .with_state(state)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(trace)
        .layer(cors)
}

/// `RUST_LOG` filter (default `info`); `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

fn load_registry(config: &ServerConfig) -> anyhow::Result<AssetRegistry> {
    match &config.registry_path {
        Some(path) => AssetRegistry::from_path(path)
            .with_context(|| format!("Failed to load registry from {}", path.display())),
        None => Ok(AssetRegistry::builtin()),
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    let registry = Arc::new(load_registry(&config)?);
    tracing::info!(
        "Registry ready: {} assets, {} scannable",
        registry.len(),
        registry.scan_universe().len()
    );

    let yahoo = Arc::new(YahooClient::new(config.yahoo_rate_limit));
    let orchestrator = AnalysisOrchestrator::new(registry, yahoo.clone(), yahoo).with_config(OrchestratorConfig {
        lookback: config.lookback,
        request_delay: config.request_delay,
        concurrency: config.scan_concurrency,
        cache_ttl: config.cache_ttl,
    });

    let state = AppState::new(Arc::new(orchestrator), config.default_min_score);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Agro monitor API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod routes_tests;
