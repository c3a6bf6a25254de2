use analysis_core::{
    round1, MacdAnalysis, MomentumAnalysis, MomentumStatus, PriceSeries, Provenance, ScoreRecord,
    SignalDirection, SupportResistance, TechnicalAnalysis, TechnicalRating, TrendAnalysis,
    TrendDirection,
};

use crate::indicators::*;

/// RSI substituted when indicators are unavailable
pub const DEFAULT_RSI: f64 = 50.0;
pub const OVERSOLD_RSI: f64 = 30.0;
pub const OVERBOUGHT_RSI: f64 = 70.0;
pub const SUPPORT_RESISTANCE_WINDOW: usize = 20;

/// Theoretical range of trend + momentum raw scores, used for rescaling
const RAW_SCORE_SPAN: f64 = 6.0;

pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_indicators(&self, series: &PriceSeries) -> Option<IndicatorSet> {
        IndicatorSet::compute(series)
    }

    /// Latest close against latest SMA-20. There is no flat band: anything not
    /// strictly above the average counts as down.
    pub fn analyze_trend(&self, series: &PriceSeries, indicators: Option<&IndicatorSet>) -> TrendAnalysis {
        let neutral = TrendAnalysis { direction: TrendDirection::Neutral, score: 0 };

        let (Some(close), Some(sma)) = (series.last_close(), indicators.and_then(|i| i.latest_sma())) else {
            return neutral;
        };

        if close > sma {
            TrendAnalysis { direction: TrendDirection::Up, score: 1 }
        } else {
            TrendAnalysis { direction: TrendDirection::Down, score: -1 }
        }
    }

    pub fn analyze_momentum(&self, indicators: Option<&IndicatorSet>) -> MomentumAnalysis {
        let Some(rsi) = indicators.and_then(|i| i.latest_rsi()) else {
            return MomentumAnalysis { status: MomentumStatus::Neutral, score: 0, rsi: DEFAULT_RSI };
        };
        Self::classify_rsi(rsi)
    }

    fn classify_rsi(rsi: f64) -> MomentumAnalysis {
        if rsi < OVERSOLD_RSI {
            MomentumAnalysis { status: MomentumStatus::Oversold, score: 3, rsi }
        } else if rsi > OVERBOUGHT_RSI {
            MomentumAnalysis { status: MomentumStatus::Overbought, score: -3, rsi }
        } else {
            MomentumAnalysis { status: MomentumStatus::Neutral, score: 0, rsi }
        }
    }

    /// MACD crossover signals are not derived yet; the reading carries the
    /// latest MACD line but a neutral placeholder signal.
    pub fn analyze_macd(&self, indicators: Option<&IndicatorSet>) -> MacdAnalysis {
        MacdAnalysis {
            signal: SignalDirection::Neutral,
            strength: 0,
            macd_line: indicators.and_then(|i| i.latest_macd()),
            provenance: Provenance::Placeholder,
        }
    }

    /// Rolling `window` high/low of the latest bars as resistance/support.
    pub fn support_resistance(&self, series: &PriceSeries, window: usize) -> Option<SupportResistance> {
        let resistance = latest(&rolling_max(&series.highs(), window))?;
        let support = latest(&rolling_min(&series.lows(), window))?;
        let current = series.last_close()?;
        if current <= 0.0 {
            return None;
        }

        Some(SupportResistance {
            resistance,
            support,
            current,
            dist_resistance_pct: (resistance - current) / current * 100.0,
            dist_support_pct: (current - support) / current * 100.0,
        })
    }

    /// Rescale trend + momentum from [-6, 6] to [0, 100] and classify.
    pub fn technical_score(&self, trend: &TrendAnalysis, momentum: &MomentumAnalysis) -> ScoreRecord<TechnicalRating> {
        let total = (trend.score + momentum.score) as f64;
        let normalized = ((total + RAW_SCORE_SPAN) / (2.0 * RAW_SCORE_SPAN) * 100.0).clamp(0.0, 100.0);
        ScoreRecord::new(round1(normalized), TechnicalRating::from_score(normalized))
    }

    /// Full technical bundle. Short series degrade to neutral defaults instead of failing.
    pub fn analyze(&self, series: &PriceSeries) -> TechnicalAnalysis {
        let indicators = self.calculate_indicators(series);
        if indicators.is_none() {
            tracing::debug!(
                "{}: {} bars, indicators need {}; using neutral technicals",
                series.symbol(),
                series.len(),
                MIN_BARS
            );
        }

        let trend = self.analyze_trend(series, indicators.as_ref());
        let momentum = self.analyze_momentum(indicators.as_ref());
        let macd = self.analyze_macd(indicators.as_ref());
        let support_resistance = self.support_resistance(series, SUPPORT_RESISTANCE_WINDOW);
        let score = self.technical_score(&trend, &momentum);

        TechnicalAnalysis {
            indicators_available: indicators.is_some(),
            trend,
            momentum,
            macd,
            support_resistance,
            score,
        }
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
