use analysis_core::{
    Bar, FundamentalSnapshot, FundamentalsProvider, LookbackPeriod, PriceHistoryProvider,
    PriceSeries, ProviderError,
};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub mod rate_limit;

use rate_limit::RateLimiter;

const BASE_URL: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const SUMMARY_MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData";
const MAX_ATTEMPTS: u32 = 3;

/// Yahoo Finance chart and quote-summary endpoints as price-history and
/// fundamentals providers.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    retry_wait: Duration,
}

impl YahooClient {
    pub fn new(requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
            rate_limiter: RateLimiter::per_minute(requests_per_minute),
            retry_wait: Duration::from_secs(5),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Pause before retrying a 429 (default 5s).
    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    /// Send a GET with rate limiting and automatic 429 retry, returning the JSON body.
    async fn get_json(&self, url: &str, query: &[(&str, &str)], symbol: &str) -> Result<Value, ProviderError> {
        for attempt in 0..MAX_ATTEMPTS {
            self.rate_limiter.acquire().await;
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    "Yahoo 429 for {}, waiting {}s before retry {}/{}",
                    symbol,
                    self.retry_wait.as_secs(),
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(self.retry_wait).await;
                continue;
            }
            if status == StatusCode::NOT_FOUND {
                return Err(ProviderError::NoData(symbol.to_string()));
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    message: message.chars().take(200).collect(),
                });
            }

            return response
                .json::<Value>()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()));
        }

        Err(ProviderError::RateLimited(format!(
            "{} still rate limited after {} attempts",
            symbol, MAX_ATTEMPTS
        )))
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooClient {
    async fn price_history(&self, symbol: &str, period: LookbackPeriod) -> Result<PriceSeries, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let json = self
            .get_json(&url, &[("range", period.as_range()), ("interval", "1d")], symbol)
            .await?;
        let series = parse_chart(symbol, &json)?;
        tracing::debug!("Fetched {} daily bars for {} ({})", series.len(), symbol, period.as_range());
        Ok(series)
    }
}

#[async_trait]
impl FundamentalsProvider for YahooClient {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, ProviderError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let json = self.get_json(&url, &[("modules", SUMMARY_MODULES)], symbol).await?;
        parse_quote_summary(symbol, &json)
    }
}

/// Parse a `/v8/finance/chart` payload into a daily series.
///
/// Bars with any missing OHLC field are skipped; a missing volume counts as zero.
pub fn parse_chart(symbol: &str, json: &Value) -> Result<PriceSeries, ProviderError> {
    let chart = json
        .get("chart")
        .ok_or_else(|| ProviderError::Parse("missing chart object".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_str()).unwrap_or_default();
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::NoData(symbol.to_string()));
        }
        return Err(ProviderError::Parse(format!("chart error: {}", error)));
    }

    let Some(result) = chart
        .get("result")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
    else {
        return Err(ProviderError::NoData(symbol.to_string()));
    };

    let Some(timestamps) = result.get("timestamp").and_then(|v| v.as_array()) else {
        return Err(ProviderError::NoData(symbol.to_string()));
    };

    let quote = result
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| ProviderError::Parse("no quote data".to_string()))?;

    let column = |name: &str| -> Result<&Vec<Value>, ProviderError> {
        quote
            .get(name)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::Parse(format!("no {} column", name)))
    };
    let opens = column("open")?;
    let highs = column("high")?;
    let lows = column("low")?;
    let closes = column("close")?;
    let volumes = column("volume")?;

    let at = |col: &Vec<Value>, i: usize| col.get(i).and_then(|v| v.as_f64());

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let (Some(ts), Some(open), Some(high), Some(low), Some(close)) =
            (ts.as_i64(), at(opens, i), at(highs, i), at(lows, i), at(closes, i))
        else {
            continue;
        };
        let timestamp = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ProviderError::Parse(format!("invalid timestamp {}", ts)))?;
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: at(volumes, i).unwrap_or(0.0),
        });
    }

    if bars.is_empty() {
        return Err(ProviderError::NoData(symbol.to_string()));
    }

    Ok(PriceSeries::from_unsorted(symbol, bars))
}

/// Parse a `/v10/finance/quoteSummary` payload into the ratios the evaluator uses.
pub fn parse_quote_summary(symbol: &str, json: &Value) -> Result<FundamentalSnapshot, ProviderError> {
    let summary = json
        .get("quoteSummary")
        .ok_or_else(|| ProviderError::Parse("missing quoteSummary object".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_str()).unwrap_or_default();
        if code.eq_ignore_ascii_case("Not Found") {
            return Err(ProviderError::NoData(symbol.to_string()));
        }
        return Err(ProviderError::Parse(format!("quoteSummary error: {}", error)));
    }

    let Some(result) = summary
        .get("result")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
    else {
        return Err(ProviderError::NoData(symbol.to_string()));
    };

    let raw = |module: &str, field: &str| -> Option<f64> {
        let value = result.get(module)?.get(field)?;
        value.get("raw").and_then(|v| v.as_f64()).or_else(|| value.as_f64())
    };

    Ok(FundamentalSnapshot {
        pe_ratio: raw("summaryDetail", "trailingPE"),
        price_to_book: raw("defaultKeyStatistics", "priceToBook"),
        return_on_equity: raw("financialData", "returnOnEquity"),
        profit_margin: raw("financialData", "profitMargins")
            .or_else(|| raw("defaultKeyStatistics", "profitMargins")),
    })
}
