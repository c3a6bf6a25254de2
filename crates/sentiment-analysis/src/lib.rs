//! News sentiment for a ticker.
//!
//! Real scoring is not built yet: every method returns a documented neutral
//! placeholder marked `Provenance::Placeholder`. The `NewsProvider` seam is in
//! place so a real news feed and scorer can slot in without touching callers.

use analysis_core::{
    Catalyst, NewsArticle, NewsBundle, NewsProvider, ProviderError, Provenance,
    SentimentAnalysis, SentimentLabel,
};
use async_trait::async_trait;

/// Articles kept on the bundle for display
pub const RECENT_NEWS_LIMIT: usize = 3;

/// News provider used until a real feed is wired in; never returns articles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNewsProvider;

#[async_trait]
impl NewsProvider for NoNewsProvider {
    async fn news(&self, _symbol: &str) -> Result<Vec<NewsArticle>, ProviderError> {
        Ok(Vec::new())
    }
}

pub struct SentimentAnalysisEngine;

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Neutral placeholder: score 0 on the -100..100 scale, zero counts.
    pub fn analyze_sentiment(&self, _news: &[NewsArticle]) -> SentimentAnalysis {
        SentimentAnalysis {
            label: SentimentLabel::Neutral,
            score: 0.0,
            positive: 0,
            negative: 0,
            neutral: 0,
            provenance: Provenance::Placeholder,
        }
    }

    /// Placeholder: no catalysts are detected yet.
    pub fn detect_catalysts(&self, _news: &[NewsArticle]) -> Vec<Catalyst> {
        Vec::new()
    }

    pub fn analyze(&self, news: Vec<NewsArticle>) -> NewsBundle {
        let sentiment = self.analyze_sentiment(&news);
        let catalysts = self.detect_catalysts(&news);
        let recent_news = news.into_iter().take(RECENT_NEWS_LIMIT).collect();

        NewsBundle {
            sentiment,
            catalysts,
            recent_news,
        }
    }

    /// Fetch news for `symbol` and analyze it. A failing feed degrades to an
    /// empty article list rather than failing the caller.
    pub async fn analyze_symbol(&self, provider: &dyn NewsProvider, symbol: &str) -> NewsBundle {
        let news = match provider.news(symbol).await {
            Ok(news) => news,
            Err(e) => {
                tracing::warn!("News fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        };
        self.analyze(news)
    }
}

impl Default for SentimentAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
