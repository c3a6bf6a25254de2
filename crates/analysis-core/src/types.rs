use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily bars for one ticker, strictly ascending by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSeries")]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

/// Wire shape of `PriceSeries`; deserialization goes through `PriceSeries::new`.
#[derive(Deserialize)]
struct UncheckedSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TryFrom<UncheckedSeries> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(raw: UncheckedSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.symbol, raw.bars)
    }
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            let (prev, next) = (pair[0].timestamp.date_naive(), pair[1].timestamp.date_naive());
            if next <= prev {
                return Err(AnalysisError::InvalidData(format!(
                    "{}: bars not strictly ascending ({} then {})",
                    symbol, prev, next
                )));
            }
        }
        Ok(Self { symbol, bars })
    }

    /// Sort by date and drop repeated dates (last bar for a date wins).
    pub fn from_unsorted(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp.date_naive() == bar.timestamp.date_naive() => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { symbol: symbol.into(), bars: deduped }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Percent change of the latest close versus the close `sessions_back` bars earlier.
    pub fn pct_change(&self, sessions_back: usize) -> Option<f64> {
        let n = self.bars.len();
        if sessions_back == 0 || n <= sessions_back {
            return None;
        }
        let base = self.bars[n - 1 - sessions_back].close;
        if base == 0.0 {
            return None;
        }
        Some((self.bars[n - 1].close / base - 1.0) * 100.0)
    }
}

/// Price-history window requested from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookbackPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
}

impl LookbackPeriod {
    pub fn as_range(&self) -> &'static str {
        match self {
            LookbackPeriod::OneMonth => "1mo",
            LookbackPeriod::ThreeMonths => "3mo",
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
            LookbackPeriod::TwoYears => "2y",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Some(LookbackPeriod::OneMonth),
            "3mo" => Some(LookbackPeriod::ThreeMonths),
            "6mo" => Some(LookbackPeriod::SixMonths),
            "1y" => Some(LookbackPeriod::OneYear),
            "2y" => Some(LookbackPeriod::TwoYears),
            _ => None,
        }
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        LookbackPeriod::SixMonths
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Equity,
    /// BDR: Brazilian depositary receipt over a foreign listing
    DepositaryReceipt,
    /// FIAGRO agribusiness investment fund
    Fund,
    Etf,
    /// Futures kept for correlation context, never scanned
    Commodity,
}

impl AssetCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equity" | "acoes_br" => Some(AssetCategory::Equity),
            "depositary_receipt" | "bdr" | "bdrs" => Some(AssetCategory::DepositaryReceipt),
            "fund" | "fiagro" | "fiagros" => Some(AssetCategory::Fund),
            "etf" | "etfs" => Some(AssetCategory::Etf),
            "commodity" | "commodities" => Some(AssetCategory::Commodity),
            _ => None,
        }
    }

    pub fn is_scannable(&self) -> bool {
        !matches!(self, AssetCategory::Commodity)
    }
}

/// Static display metadata for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Provider symbol, e.g. `SLCE3.SA`
    pub symbol: String,
    /// Symbol shown to users, e.g. `SLCE3` or `DE (D1EE34)`
    pub display_symbol: String,
    pub name: String,
    pub sector: String,
    pub subsector: String,
    pub category: AssetCategory,
    #[serde(default)]
    pub cross_listed: bool,
}

/// Point-in-time fundamental ratios; any field may be unknown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub pe_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    /// Fraction, e.g. 0.18 for 18%
    pub return_on_equity: Option<f64>,
    /// Fraction, e.g. 0.07 for 7%
    pub profit_margin: Option<f64>,
}

impl FundamentalSnapshot {
    pub fn is_empty(&self) -> bool {
        self.pe_ratio.is_none()
            && self.price_to_book.is_none()
            && self.return_on_equity.is_none()
            && self.profit_margin.is_none()
    }
}

/// News article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub published_utc: DateTime<Utc>,
    pub article_url: String,
    pub description: Option<String>,
    pub source: Option<String>,
}

/// Whether a value was derived from data or is a neutral placeholder for an
/// analysis that has not been built yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Computed,
    Placeholder,
}
