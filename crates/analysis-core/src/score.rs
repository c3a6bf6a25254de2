use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to one decimal place, the precision every published score carries.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A 0-100 score with its discrete classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord<C> {
    pub score: f64,
    pub classification: C,
}

impl<C> ScoreRecord<C> {
    pub fn new(score: f64, classification: C) -> Self {
        Self { score, classification }
    }
}

/// Classification of the 0-100 technical score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechnicalRating {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
}

impl TechnicalRating {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => TechnicalRating::StrongBuy,
            s if s >= 55.0 => TechnicalRating::Buy,
            s if s >= 45.0 => TechnicalRating::Neutral,
            _ => TechnicalRating::Sell,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            TechnicalRating::StrongBuy => "STRONG BUY",
            TechnicalRating::Buy => "BUY",
            TechnicalRating::Neutral => "NEUTRAL",
            TechnicalRating::Sell => "SELL",
        }
    }
}

impl fmt::Display for TechnicalRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Classification of the 0-100 fundamental score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundamentalRating {
    Excellent,
    Good,
    Fair,
}

impl FundamentalRating {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 70.0 => FundamentalRating::Excellent,
            s if s >= 50.0 => FundamentalRating::Good,
            _ => FundamentalRating::Fair,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            FundamentalRating::Excellent => "EXCELLENT",
            FundamentalRating::Good => "GOOD",
            FundamentalRating::Fair => "FAIR",
        }
    }
}

impl fmt::Display for FundamentalRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Final recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StrongBuy,
    Buy,
    Neutral,
}

impl Action {
    pub fn from_score(final_score: f64) -> Self {
        match final_score {
            s if s >= 70.0 => Action::StrongBuy,
            s if s >= 55.0 => Action::Buy,
            _ => Action::Neutral,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Action::StrongBuy => Priority::High,
            Action::Buy => Priority::Medium,
            Action::Neutral => Priority::Low,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Action::StrongBuy => "STRONG BUY",
            Action::Buy => "BUY",
            Action::Neutral => "NEUTRAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "STRONG_BUY" => Some(Action::StrongBuy),
            "BUY" => Some(Action::Buy),
            "NEUTRAL" => Some(Action::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}
