//! Registry lookups and static market context.

use analysis_core::{AssetCategory, AssetMetadata};
use asset_registry::{market_context, MarketContext};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct AssetQuery {
    #[serde(default)]
    pub category: Option<String>,
}

pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(list_assets))
        .route("/api/assets/:symbol", get(get_asset))
        .route("/api/market-context", get(get_market_context))
}

async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> Result<Json<ApiResponse<Vec<AssetMetadata>>>, AppError> {
    let registry = state.orchestrator.registry();

    let assets = match query.category.as_deref() {
        Some(raw) => {
            let category = AssetCategory::parse(raw)
                .ok_or_else(|| AppError::bad_request(format!("Unknown category '{}'", raw)))?;
            registry.by_category(category).into_iter().cloned().collect()
        }
        None => registry.all().to_vec(),
    };

    Ok(Json(ApiResponse::success(assets)))
}

async fn get_asset(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<AssetMetadata>>, AppError> {
    let symbol = symbol.to_uppercase();
    let asset = state
        .orchestrator
        .registry()
        .get(&symbol)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Unknown ticker {}", symbol)))?;

    Ok(Json(ApiResponse::success(asset)))
}

async fn get_market_context() -> Json<ApiResponse<MarketContext>> {
    Json(ApiResponse::success(market_context()))
}
