//! Scans and the views built on the last stored scan report.

use analysis_core::{Action, AssetCategory};
use analysis_orchestrator::{
    compare, dashboard_summary, portfolio, rankings, sector_summary, ComparisonRow,
    DashboardSummary, InvestorProfile, PortfolioSuggestion, RankingFilter, RankingRow,
    ScanOptions, ScanReport, SectorSummary,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    /// Comma-separated subsectors
    pub subsectors: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    /// Comma-separated actions, e.g. `STRONG_BUY,BUY`
    pub actions: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    pub profile: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub symbols: String,
}

pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/scan", post(run_scan))
        .route("/api/scan/latest", get(latest_scan))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/sectors", get(get_sectors))
        .route("/api/rankings", get(get_rankings))
        .route("/api/portfolio", get(get_portfolio))
        .route("/api/compare", get(get_compare))
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_categories(raw: &[String]) -> Result<Vec<AssetCategory>, AppError> {
    raw.iter()
        .map(|c| {
            AssetCategory::parse(c).ok_or_else(|| AppError::bad_request(format!("Unknown category '{}'", c)))
        })
        .collect()
}

/// Clone of the stored report, or 404 when no scan has run yet
async fn stored_report(state: &AppState) -> Result<ScanReport, AppError> {
    state
        .last_scan
        .read()
        .await
        .clone()
        .ok_or_else(|| AppError::not_found("No scan has been run yet. POST /api/scan first."))
}

/// A bodiless POST scans with defaults; any body must be valid `ScanRequest` JSON.
fn scan_request(body: Result<Json<ScanRequest>, JsonRejection>) -> Result<ScanRequest, AppError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ScanRequest::default()),
        Err(rejection) => Err(AppError::bad_request(format!("Invalid scan request: {}", rejection.body_text()))),
    }
}

async fn run_scan(
    State(state): State<AppState>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ScanReport>>, AppError> {
    let request = scan_request(body)?;

    let min_score = request.min_score.unwrap_or(state.default_min_score);
    if !(0.0..=100.0).contains(&min_score) {
        return Err(AppError::bad_request(format!("min_score must be within 0-100, got {}", min_score)));
    }
    let categories = request
        .categories
        .as_deref()
        .map(parse_categories)
        .transpose()?;

    let report = state
        .orchestrator
        .scan_with(&ScanOptions { min_score, categories })
        .await;

    *state.last_scan.write().await = Some(report.clone());
    Ok(Json(ApiResponse::success(report)))
}

async fn latest_scan(State(state): State<AppState>) -> Result<Json<ApiResponse<ScanReport>>, AppError> {
    Ok(Json(ApiResponse::success(stored_report(&state).await?)))
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let report = stored_report(&state).await?;
    Ok(Json(ApiResponse::success(dashboard_summary(&report.results))))
}

async fn get_sectors(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<SectorSummary>>>, AppError> {
    let report = stored_report(&state).await?;
    Ok(Json(ApiResponse::success(sector_summary(&report.results))))
}

async fn get_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> Result<Json<ApiResponse<Vec<RankingRow>>>, AppError> {
    let mut filter = RankingFilter::default();
    if let Some(raw) = query.subsectors.as_deref() {
        filter.subsectors = split_list(raw).map(str::to_string).collect();
    }
    if let Some(min) = query.min_score {
        filter.min_score = min;
    }
    if let Some(max) = query.max_score {
        filter.max_score = max;
    }
    if let Some(raw) = query.actions.as_deref() {
        filter.actions = split_list(raw)
            .map(|a| Action::parse(a).ok_or_else(|| AppError::bad_request(format!("Unknown action '{}'", a))))
            .collect::<Result<_, _>>()?;
    }

    let report = stored_report(&state).await?;
    Ok(Json(ApiResponse::success(rankings(&report.results, &filter))))
}

async fn get_portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Result<Json<ApiResponse<PortfolioSuggestion>>, AppError> {
    let profile = match query.profile.as_deref() {
        Some(raw) => InvestorProfile::parse(raw)
            .ok_or_else(|| AppError::bad_request(format!("Unknown investor profile '{}'", raw)))?,
        None => InvestorProfile::Moderate,
    };

    let report = stored_report(&state).await?;
    Ok(Json(ApiResponse::success(portfolio(&report.results, profile))))
}

async fn get_compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ApiResponse<Vec<ComparisonRow>>>, AppError> {
    let symbols: Vec<String> = split_list(&query.symbols).map(str::to_uppercase).collect();
    let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();

    let report = stored_report(&state).await?;
    let rows = compare(&report.results, &symbols)?;
    Ok(Json(ApiResponse::success(rows)))
}
