use analysis_core::AssetAnalysis;
use analysis_orchestrator::ChartData;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{ApiResponse, AppError, AppState};

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze/:symbol", get(analyze_symbol))
        .route("/api/chart/:symbol", get(get_chart))
}

async fn analyze_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<AssetAnalysis>>, AppError> {
    let symbol = symbol.to_uppercase();
    tracing::info!("Analysis requested for {}", symbol);

    let analysis = state.orchestrator.analyze(&symbol).await?;
    Ok(Json(ApiResponse::success(analysis)))
}

async fn get_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<ChartData>>, AppError> {
    let symbol = symbol.to_uppercase();
    let chart = state.orchestrator.chart(&symbol).await?;
    Ok(Json(ApiResponse::success(chart)))
}
