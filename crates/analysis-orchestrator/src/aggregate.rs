use analysis_core::{round1, Action, Recommendation, StrategyNote};

pub const TECHNICAL_WEIGHT: f64 = 0.40;
pub const FUNDAMENTAL_WEIGHT: f64 = 0.40;
pub const SENTIMENT_WEIGHT: f64 = 0.20;

/// Blend the three sub-scores into the unrounded 0-100 final score.
///
/// `technical` and `fundamental` are on 0..100, `sentiment` on -100..100 and is
/// rescaled to 0..100 before weighting.
pub fn final_score(technical: f64, fundamental: f64, sentiment: f64) -> f64 {
    let sentiment = (sentiment + 100.0) / 2.0;
    (technical * TECHNICAL_WEIGHT + fundamental * FUNDAMENTAL_WEIGHT + sentiment * SENTIMENT_WEIGHT)
        .clamp(0.0, 100.0)
}

/// Tier the blended score. The action is decided on the unrounded value; the
/// published score is rounded to one decimal.
pub fn recommend(technical: f64, fundamental: f64, sentiment: f64) -> Recommendation {
    let score = final_score(technical, fundamental, sentiment);
    let action = Action::from_score(score);
    Recommendation {
        final_score: round1(score),
        action,
        priority: action.priority(),
        strategy: StrategyNote::default(),
    }
}
