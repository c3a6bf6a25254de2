use async_trait::async_trait;
use crate::{FundamentalSnapshot, LookbackPeriod, NewsArticle, PriceSeries, ProviderError};

/// Source of daily OHLCV history.
///
/// An empty history must be reported as `ProviderError::NoData`, never as an
/// empty `PriceSeries`.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<PriceSeries, ProviderError>;
}

/// Source of point-in-time fundamental ratios
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, ProviderError>;
}

/// Source of recent news articles for a ticker
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn news(&self, symbol: &str) -> Result<Vec<NewsArticle>, ProviderError>;
}
