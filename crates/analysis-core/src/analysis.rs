//! Per-ticker analysis records produced by the engines and the aggregator.
//!
//! Everything here is built once per `analyze` call and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    Action, AssetMetadata, FundamentalRating, FundamentalSnapshot, NewsArticle, Priority,
    Provenance, ScoreRecord, TechnicalRating,
};

// ---------------------------------------------------------------------------
// Technical
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Up,
    Down,
    /// Only reported when indicators are unavailable
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// +1 up, -1 down, 0 unavailable
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumStatus {
    Oversold,
    Overbought,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumAnalysis {
    pub status: MomentumStatus,
    /// +3 oversold, -3 overbought, 0 otherwise
    pub score: i32,
    pub rsi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// MACD reading. The signal itself is not derived yet and always neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdAnalysis {
    pub signal: SignalDirection,
    pub strength: i32,
    /// Latest MACD line value (EMA12 - EMA26) when available
    pub macd_line: Option<f64>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub resistance: f64,
    pub support: f64,
    pub current: f64,
    pub dist_resistance_pct: f64,
    pub dist_support_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub indicators_available: bool,
    pub trend: TrendAnalysis,
    pub momentum: MomentumAnalysis,
    pub macd: MacdAnalysis,
    pub support_resistance: Option<SupportResistance>,
    pub score: ScoreRecord<TechnicalRating>,
}

// ---------------------------------------------------------------------------
// Fundamental
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationStatus {
    Cheap,
    Fair,
    #[serde(rename = "N/A")]
    NotAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationAnalysis {
    pub status: ValuationStatus,
    /// 2 when cheap, otherwise 0
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfitabilityQuality {
    Good,
    Average,
    #[serde(rename = "N/A")]
    NotAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityAnalysis {
    pub quality: ProfitabilityQuality,
    /// 2 when good, otherwise 0
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStatus {
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAnalysis {
    pub status: GrowthStatus,
    pub score: i32,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthAnalysis {
    pub health: HealthStatus,
    pub score: i32,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalAnalysis {
    pub valuation: ValuationAnalysis,
    pub profitability: ProfitabilityAnalysis,
    pub growth: GrowthAnalysis,
    pub health: HealthAnalysis,
    pub score: ScoreRecord<FundamentalRating>,
    /// Raw ratios the evaluation was based on
    pub snapshot: Option<FundamentalSnapshot>,
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub label: SentimentLabel,
    /// -100 (all negative) to 100 (all positive)
    pub score: f64,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalyst {
    pub title: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsBundle {
    pub sentiment: SentimentAnalysis,
    pub catalysts: Vec<Catalyst>,
    pub recent_news: Vec<NewsArticle>,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub current: f64,
    pub change_1d_pct: Option<f64>,
    pub change_1m_pct: Option<f64>,
}

/// Fixed trade plan attached to every recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyNote {
    pub stop_loss_pct: f64,
    pub target_pct: f64,
    pub horizon_days: u32,
}

impl Default for StrategyNote {
    fn default() -> Self {
        Self {
            stop_loss_pct: -3.0,
            target_pct: 15.0,
            horizon_days: 5,
        }
    }
}

impl fmt::Display for StrategyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stop: {}% | Target: +{}% | Horizon: {} days",
            self.stop_loss_pct, self.target_pct, self.horizon_days
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub final_score: f64,
    pub action: Action,
    pub priority: Priority,
    pub strategy: StrategyNote,
}

/// Full per-ticker result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub asset: AssetMetadata,
    pub price: PriceSummary,
    pub technical: TechnicalAnalysis,
    pub fundamental: FundamentalAnalysis,
    pub news: NewsBundle,
    pub recommendation: Recommendation,
    pub timestamp: DateTime<Utc>,
}

impl AssetAnalysis {
    pub fn symbol(&self) -> &str {
        &self.asset.symbol
    }

    pub fn final_score(&self) -> f64 {
        self.recommendation.final_score
    }
}
