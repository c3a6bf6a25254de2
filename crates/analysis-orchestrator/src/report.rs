use analysis_core::{AssetAnalysis, AssetCategory, ProviderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a ticker produced no analysis
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("ticker is not in the registry")]
    UnknownTicker,

    #[error("provider returned no price data")]
    NoPriceData,

    #[error("only {bars} bars of history, {required} required")]
    InsufficientHistory { bars: usize, required: usize },

    #[error("provider error: {message}")]
    Provider { message: String },
}

impl From<ProviderError> for FailureReason {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::NoData(_) => FailureReason::NoPriceData,
            other => FailureReason::Provider { message: other.to_string() },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{symbol}: {reason}")]
pub struct AnalysisFailure {
    pub symbol: String,
    pub reason: FailureReason,
}

impl AnalysisFailure {
    pub fn new(symbol: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            symbol: symbol.into(),
            reason,
        }
    }
}

pub type AnalysisOutcome = Result<AssetAnalysis, AnalysisFailure>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Inclusive threshold on the published (rounded) final score
    pub min_score: f64,
    /// Restrict the scan to these categories; `None` scans the whole universe
    pub categories: Option<Vec<AssetCategory>>,
}

impl ScanOptions {
    pub fn with_min_score(min_score: f64) -> Self {
        Self {
            min_score,
            categories: None,
        }
    }

    pub fn includes(&self, category: AssetCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |categories| categories.contains(&category))
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::with_min_score(50.0)
    }
}

/// Outcome of one pass over the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub min_score: f64,
    /// Analyses at or above `min_score`, best first, ties in registry order
    pub results: Vec<AssetAnalysis>,
    pub failures: Vec<AnalysisFailure>,
    pub total_scanned: usize,
    /// Successful analyses dropped by the threshold
    pub below_threshold: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn succeeded(&self) -> usize {
        self.results.len() + self.below_threshold
    }
}
