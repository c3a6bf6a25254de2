use analysis_core::{
    AssetAnalysis, AssetMetadata, Bar, FundamentalSnapshot, FundamentalsProvider, LookbackPeriod,
    NewsProvider, PriceHistoryProvider, PriceSeries, PriceSummary, ProviderError,
};
use asset_registry::AssetRegistry;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use fundamental_analysis::FundamentalAnalysisEngine;
use futures_util::stream::{self, StreamExt};
use sentiment_analysis::{NoNewsProvider, SentimentAnalysisEngine};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use technical_analysis::{IndicatorSet, TechnicalAnalysisEngine, MIN_BARS};

pub mod aggregate;
pub mod report;
pub mod screener;
pub mod throttle;

pub use aggregate::{final_score, recommend};
pub use report::{AnalysisFailure, AnalysisOutcome, FailureReason, ScanOptions, ScanReport};
pub use screener::{
    compare, dashboard_summary, portfolio, rankings, sector_summary, BestAsset, ComparisonRow,
    DashboardSummary, InvestorProfile, PortfolioSuggestion, RankingFilter, RankingRow,
    SectorCount, SectorSummary,
};
pub use throttle::Throttle;

/// Sessions between the latest close and the one-month reference close
const ONE_MONTH_SESSIONS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub lookback: LookbackPeriod,
    /// Fixed delay between provider round-trips, shared across scan tasks
    pub request_delay: Duration,
    /// Tickers analyzed at once during a scan; 1 is strictly sequential
    pub concurrency: usize,
    /// Zero disables the provider response cache
    pub cache_ttl: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            lookback: LookbackPeriod::SixMonths,
            request_delay: Duration::from_millis(500),
            concurrency: 1,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Bars plus aligned indicator series for charting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// `None` when the history is too short for indicators
    pub indicators: Option<IndicatorSet>,
}

pub struct AnalysisOrchestrator {
    registry: Arc<AssetRegistry>,
    price_provider: Arc<dyn PriceHistoryProvider>,
    fundamentals_provider: Arc<dyn FundamentalsProvider>,
    news_provider: Arc<dyn NewsProvider>,
    technical_analyzer: TechnicalAnalysisEngine,
    fundamental_analyzer: FundamentalAnalysisEngine,
    sentiment_analyzer: SentimentAnalysisEngine,
    config: OrchestratorConfig,
    throttle: Throttle,
    /// Price history per (symbol, lookback)
    price_cache: DashMap<String, CacheEntry<PriceSeries>>,
    /// Fundamentals per symbol; failed fetches are not cached
    /// `None` records a definitive "no fundamentals" answer
    fundamentals_cache: DashMap<String, CacheEntry<Option<FundamentalSnapshot>>>,
}

impl AnalysisOrchestrator {
    /// News defaults to [`NoNewsProvider`] until a real feed is attached.
    pub fn new(
        registry: Arc<AssetRegistry>,
        price_provider: Arc<dyn PriceHistoryProvider>,
        fundamentals_provider: Arc<dyn FundamentalsProvider>,
    ) -> Self {
        let config = OrchestratorConfig::default();
        Self {
            registry,
            price_provider,
            fundamentals_provider,
            news_provider: Arc::new(NoNewsProvider),
            technical_analyzer: TechnicalAnalysisEngine::new(),
            fundamental_analyzer: FundamentalAnalysisEngine::new(),
            sentiment_analyzer: SentimentAnalysisEngine::new(),
            throttle: Throttle::new(config.request_delay),
            config,
            price_cache: DashMap::new(),
            fundamentals_cache: DashMap::new(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.throttle = Throttle::new(config.request_delay);
        self.config = config;
        self
    }

    pub fn with_news_provider(mut self, news_provider: Arc<dyn NewsProvider>) -> Self {
        self.news_provider = news_provider;
        self
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn clear_cache(&self) {
        self.price_cache.clear();
        self.fundamentals_cache.clear();
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
        let age = (Utc::now() - cached_at).num_milliseconds();
        age >= 0 && (age as u128) < self.config.cache_ttl.as_millis()
    }

    /// Price history for `symbol` over the configured lookback (cached).
    /// Only a cache miss waits on the throttle.
    pub async fn price_history(&self, symbol: &str) -> Result<PriceSeries, ProviderError> {
        let cache_key = format!("{}:{}", symbol, self.config.lookback.as_range());
        if let Some(entry) = self.price_cache.get(&cache_key) {
            if self.is_fresh(entry.cached_at) {
                return Ok(entry.data.clone());
            }
        }

        self.throttle.wait().await;
        let series = self.price_provider.price_history(symbol, self.config.lookback).await?;

        if !self.config.cache_ttl.is_zero() {
            self.price_cache.insert(cache_key, CacheEntry {
                data: series.clone(),
                cached_at: Utc::now(),
            });
        }
        Ok(series)
    }

    /// Fundamentals for `symbol` (cached). A failed fetch degrades to `None`;
    /// only definitive answers are cached, transient failures are retried next time.
    pub async fn fundamentals(&self, symbol: &str) -> Option<FundamentalSnapshot> {
        if let Some(entry) = self.fundamentals_cache.get(symbol) {
            if self.is_fresh(entry.cached_at) {
                return entry.data.clone();
            }
        }

        let snapshot = match self.fundamentals_provider.fundamentals(symbol).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) if e.is_transient() => {
                tracing::warn!("Fundamentals unavailable for {}: {}", symbol, e);
                return None;
            }
            Err(e) => {
                tracing::debug!("No fundamentals for {}: {}", symbol, e);
                None
            }
        };

        if !self.config.cache_ttl.is_zero() {
            self.fundamentals_cache.insert(symbol.to_string(), CacheEntry {
                data: snapshot.clone(),
                cached_at: Utc::now(),
            });
        }
        snapshot
    }

    fn lookup(&self, symbol: &str) -> Result<&AssetMetadata, AnalysisFailure> {
        self.registry
            .get(symbol)
            .ok_or_else(|| AnalysisFailure::new(symbol, FailureReason::UnknownTicker))
    }

    /// Fetch history and require enough bars for indicators.
    async fn usable_history(&self, symbol: &str) -> Result<PriceSeries, AnalysisFailure> {
        let series = self
            .price_history(symbol)
            .await
            .map_err(|e| AnalysisFailure::new(symbol, FailureReason::from(e)))?;

        if series.is_empty() {
            return Err(AnalysisFailure::new(symbol, FailureReason::NoPriceData));
        }
        if series.len() < MIN_BARS {
            return Err(AnalysisFailure::new(
                symbol,
                FailureReason::InsufficientHistory { bars: series.len(), required: MIN_BARS },
            ));
        }
        Ok(series)
    }

    /// Analyze one registered ticker end to end.
    pub async fn analyze(&self, symbol: &str) -> AnalysisOutcome {
        let asset = self.lookup(symbol)?;
        tracing::debug!("Analyzing {}", symbol);

        let series = self.usable_history(symbol).await?;
        let (snapshot, news) = tokio::join!(
            self.fundamentals(symbol),
            self.sentiment_analyzer
                .analyze_symbol(self.news_provider.as_ref(), symbol),
        );

        let Some(price) = price_summary(&series) else {
            return Err(AnalysisFailure::new(symbol, FailureReason::NoPriceData));
        };

        let technical = self.technical_analyzer.analyze(&series);
        let fundamental = self.fundamental_analyzer.analyze(snapshot.as_ref());
        let recommendation = recommend(
            technical.score.score,
            fundamental.score.score,
            news.sentiment.score,
        );

        tracing::debug!(
            "{}: technical {} ({}) fundamental {} ({}) final {} {}",
            symbol,
            technical.score.score,
            technical.score.classification,
            fundamental.score.score,
            fundamental.score.classification,
            recommendation.final_score,
            recommendation.action
        );

        Ok(AssetAnalysis {
            asset: asset.clone(),
            price,
            technical,
            fundamental,
            news,
            recommendation,
            timestamp: Utc::now(),
        })
    }

    /// Bars and indicator series for a registered ticker. Short histories
    /// still chart, without indicators.
    pub async fn chart(&self, symbol: &str) -> Result<ChartData, AnalysisFailure> {
        self.lookup(symbol)?;
        let series = self
            .price_history(symbol)
            .await
            .map_err(|e| AnalysisFailure::new(symbol, FailureReason::from(e)))?;

        Ok(ChartData {
            symbol: symbol.to_string(),
            indicators: self.technical_analyzer.calculate_indicators(&series),
            bars: series.bars().to_vec(),
        })
    }

    pub async fn scan(&self, min_score: f64) -> ScanReport {
        self.scan_with(&ScanOptions::with_min_score(min_score)).await
    }

    /// Analyze every scannable ticker allowed by `options`.
    ///
    /// A failing ticker lands in `failures` and never aborts the scan. Results
    /// are sorted by final score, best first, ties kept in registry order.
    pub async fn scan_with(&self, options: &ScanOptions) -> ScanReport {
        let started_at = Utc::now();
        let symbols: Vec<String> = self
            .registry
            .scan_universe()
            .into_iter()
            .filter(|a| options.includes(a.category))
            .map(|a| a.symbol.clone())
            .collect();
        let total_scanned = symbols.len();

        tracing::info!(
            "Starting scan of {} assets (min score {}, concurrency {})",
            total_scanned,
            options.min_score,
            self.config.concurrency.max(1)
        );

        // `buffered` keeps output in input order regardless of completion order
        let tasks = symbols
            .into_iter()
            .map(|symbol| async move { self.analyze(&symbol).await });
        let outcomes: Vec<AnalysisOutcome> = stream::iter(tasks)
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut below_threshold = 0;
        for outcome in outcomes {
            match outcome {
                Ok(analysis) if analysis.final_score() >= options.min_score => results.push(analysis),
                Ok(_) => below_threshold += 1,
                Err(failure) => {
                    tracing::warn!("Skipping {}", failure);
                    failures.push(failure);
                }
            }
        }

        // Stable sort: equal scores stay in registry order
        results.sort_by(|a, b| {
            b.final_score()
                .partial_cmp(&a.final_score())
                .unwrap_or(Ordering::Equal)
        });

        tracing::info!(
            "Scan complete: {}/{} passed, {} below threshold, {} failed",
            results.len(),
            total_scanned,
            below_threshold,
            failures.len()
        );

        ScanReport {
            min_score: options.min_score,
            results,
            failures,
            total_scanned,
            below_threshold,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Latest close with 1-day and 1-month changes.
fn price_summary(series: &PriceSeries) -> Option<PriceSummary> {
    Some(PriceSummary {
        current: series.last_close()?,
        change_1d_pct: series.pct_change(1),
        change_1m_pct: series.pct_change(ONE_MONTH_SESSIONS),
    })
}

#[cfg(test)]
pub(crate) mod test_support;
