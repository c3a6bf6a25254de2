//! Indicator math over closing-price slices.
//!
//! Every function returns a series aligned to its input: same length, `None`
//! until the indicator's warm-up window is satisfied.

use analysis_core::PriceSeries;
use serde::{Deserialize, Serialize};

/// Simple Moving Average over a full window
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    let mut sum: f64 = data[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);
    for i in period..data.len() {
        sum += data[i] - data[i - period];
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Recursive exponential smoothing `y[t] = (1 - alpha) * y[t-1] + alpha * x[t]`,
/// seeded with the first observation, reported once `min_periods` values are in.
fn smooth(data: &[f64], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(data.len());
    let mut prev: Option<f64> = None;
    for (i, &x) in data.iter().enumerate() {
        let y = match prev {
            None => x,
            Some(p) => (1.0 - alpha) * p + alpha * x,
        };
        prev = Some(y);
        result.push(if i + 1 >= min_periods { Some(y) } else { None });
    }
    result
}

/// Exponential Moving Average with span `period`
pub fn ema(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; data.len()];
    }
    smooth(data, 2.0 / (period as f64 + 1.0), period)
}

/// Relative Strength Index with Wilder smoothing (`alpha = 1 / period`).
///
/// The first bar has no change and counts as a zero gain and zero loss.
/// When the average loss is zero the RSI is 100.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || data.is_empty() {
        return vec![None; data.len()];
    }

    let mut gains = Vec::with_capacity(data.len());
    let mut losses = Vec::with_capacity(data.len());
    gains.push(0.0);
    losses.push(0.0);
    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = smooth(&gains, alpha, period);
    let avg_loss = smooth(&losses, alpha, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) => {
                if *l == 0.0 {
                    Some(100.0)
                } else {
                    Some(100.0 - 100.0 / (1.0 + g / l))
                }
            }
            _ => None,
        })
        .collect()
}

/// MACD line: fast EMA minus slow EMA. Signal line and histogram are not needed downstream.
pub fn macd_line(data: &[f64], fast_period: usize, slow_period: usize) -> Vec<Option<f64>> {
    if fast_period == 0 || slow_period == 0 || slow_period < fast_period {
        return vec![None; data.len()];
    }

    let fast = ema(data, fast_period);
    let slow = ema(data, slow_period);
    fast.iter()
        .zip(slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect()
}

/// Rolling maximum over a full window
pub fn rolling_max(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(data, window, f64::max)
}

/// Rolling minimum over a full window
pub fn rolling_min(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(data, window, f64::min)
}

fn rolling(data: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; data.len()];
    }
    (0..data.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                data[i + 1 - window..=i].iter().copied().reduce(pick)
            }
        })
        .collect()
}

/// Last defined value of an aligned series
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

pub const MIN_BARS: usize = 50;
pub const SMA_WINDOW: usize = 20;
pub const RSI_WINDOW: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;

/// Indicator series aligned to a price series' bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_20: Vec<Option<f64>>,
    pub rsi_14: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
}

impl IndicatorSet {
    /// `None` when the series is shorter than [`MIN_BARS`]; partial indicators are never produced.
    pub fn compute(series: &PriceSeries) -> Option<Self> {
        if series.len() < MIN_BARS {
            return None;
        }
        let closes = series.closes();
        Some(Self {
            sma_20: sma(&closes, SMA_WINDOW),
            rsi_14: rsi(&closes, RSI_WINDOW),
            macd: macd_line(&closes, MACD_FAST, MACD_SLOW),
        })
    }

    pub fn len(&self) -> usize {
        self.sma_20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma_20.is_empty()
    }

    pub fn latest_sma(&self) -> Option<f64> {
        latest(&self.sma_20)
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        latest(&self.rsi_14)
    }

    pub fn latest_macd(&self) -> Option<f64> {
        latest(&self.macd)
    }
}
