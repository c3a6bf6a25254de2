//! In-memory providers and fixtures shared by the orchestrator tests.

use analysis_core::{
    Action, AssetAnalysis, AssetCategory, AssetMetadata, Bar, FundamentalSnapshot,
    FundamentalsProvider, LookbackPeriod, PriceHistoryProvider, PriceSeries, PriceSummary,
    ProviderError,
};
use asset_registry::AssetRegistry;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use fundamental_analysis::FundamentalAnalysisEngine;
use sentiment_analysis::SentimentAnalysisEngine;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use technical_analysis::TechnicalAnalysisEngine;

use crate::recommend;

#[derive(Clone, Default)]
pub struct MockPrices {
    series: HashMap<String, Result<PriceSeries, ProviderError>>,
    calls: Arc<AtomicUsize>,
}

impl MockPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, result: Result<PriceSeries, ProviderError>) -> Self {
        self.series.insert(symbol.to_string(), result);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PriceHistoryProvider for MockPrices {
    async fn price_history(&self, symbol: &str, _period: LookbackPeriod) -> Result<PriceSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NoData(symbol.to_string())))
    }
}

#[derive(Clone, Default)]
pub struct MockFundamentals {
    snapshots: HashMap<String, Result<FundamentalSnapshot, ProviderError>>,
    calls: Arc<AtomicUsize>,
}

impl MockFundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, snapshot: FundamentalSnapshot) -> Self {
        self.snapshots.insert(symbol.to_string(), Ok(snapshot));
        self
    }

    pub fn with_error(mut self, symbol: &str, error: ProviderError) -> Self {
        self.snapshots.insert(symbol.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl FundamentalsProvider for MockFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(ProviderError::NoData(symbol.to_string())))
    }
}

pub fn series_from(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 500_000.0,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

/// Strictly rising: trend up, RSI 100 (overbought), technical 33.3
pub fn rising_series(symbol: &str, len: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
    series_from(symbol, &closes)
}

/// Strictly falling: trend down, RSI 0 (oversold), technical 66.7
pub fn falling_series(symbol: &str, len: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..len).map(|i| 200.0 - i as f64).collect();
    series_from(symbol, &closes)
}

/// 100/101 zigzag; an even length ends on 101 above the SMA with RSI near 52,
/// technical 58.3
pub fn alternating_series(symbol: &str, len: usize) -> PriceSeries {
    let closes: Vec<f64> = (0..len).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
    series_from(symbol, &closes)
}

/// Cheap and profitable: fundamental 83.3
pub fn excellent_snapshot() -> FundamentalSnapshot {
    FundamentalSnapshot {
        pe_ratio: Some(8.5),
        price_to_book: Some(1.4),
        return_on_equity: Some(0.21),
        profit_margin: Some(0.09),
    }
}

/// Profitable but not cheap: fundamental 66.7
pub fn one_signal_snapshot() -> FundamentalSnapshot {
    FundamentalSnapshot {
        pe_ratio: Some(22.0),
        price_to_book: Some(3.1),
        return_on_equity: Some(0.19),
        profit_margin: Some(0.12),
    }
}

pub fn asset(symbol: &str, sector: &str, category: AssetCategory) -> AssetMetadata {
    AssetMetadata {
        symbol: symbol.to_string(),
        display_symbol: symbol.trim_end_matches(".SA").to_string(),
        name: format!("{} S.A.", symbol),
        sector: sector.to_string(),
        subsector: format!("{} core", sector),
        category,
        cross_listed: category == AssetCategory::DepositaryReceipt,
    }
}

pub fn registry_of(entries: &[(&str, &str, AssetCategory)]) -> AssetRegistry {
    AssetRegistry::new(
        entries
            .iter()
            .map(|(symbol, sector, category)| asset(symbol, sector, *category))
            .collect(),
    )
    .unwrap()
}

/// Build an analysis record directly from a price series and snapshot,
/// going through the real engines.
pub fn analysis_of(
    symbol: &str,
    sector: &str,
    series: &PriceSeries,
    snapshot: Option<FundamentalSnapshot>,
) -> AssetAnalysis {
    let technical = TechnicalAnalysisEngine::new().analyze(series);
    let fundamental = FundamentalAnalysisEngine::new().analyze(snapshot.as_ref());
    let news = SentimentAnalysisEngine::new().analyze(Vec::new());
    let recommendation = recommend(technical.score.score, fundamental.score.score, news.sentiment.score);

    AssetAnalysis {
        asset: asset(symbol, sector, AssetCategory::Equity),
        price: PriceSummary {
            current: series.last_close().unwrap(),
            change_1d_pct: series.pct_change(1),
            change_1m_pct: series.pct_change(20),
        },
        technical,
        fundamental,
        news,
        recommendation,
        timestamp: Utc::now(),
    }
}

/// Overwrite the published scores of an analysis, keeping the record consistent.
pub fn with_scores(mut analysis: AssetAnalysis, technical: f64, fundamental: f64, final_score: f64) -> AssetAnalysis {
    analysis.technical.score.score = technical;
    analysis.fundamental.score.score = fundamental;
    analysis.recommendation.final_score = final_score;
    analysis.recommendation.action = Action::from_score(final_score);
    analysis.recommendation.priority = analysis.recommendation.action.priority();
    analysis
}
