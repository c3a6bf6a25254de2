use analysis_core::{
    round1, FundamentalAnalysis, FundamentalRating, FundamentalSnapshot, GrowthAnalysis,
    GrowthStatus, HealthAnalysis, HealthStatus, ProfitabilityAnalysis, ProfitabilityQuality,
    Provenance, ScoreRecord, ValuationAnalysis, ValuationStatus,
};

/// P/E strictly below this is cheap
pub const CHEAP_PE: f64 = 15.0;
/// ROE strictly above this (as a fraction) is good
pub const GOOD_ROE: f64 = 0.15;

/// Points awarded by each binary check
const SIGNAL_POINTS: i32 = 2;

pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Treat a snapshot with no ratios at all the same as no snapshot.
    fn usable(snapshot: Option<&FundamentalSnapshot>) -> Option<&FundamentalSnapshot> {
        snapshot.filter(|s| !s.is_empty())
    }

    pub fn analyze_valuation(&self, snapshot: Option<&FundamentalSnapshot>) -> ValuationAnalysis {
        let Some(snapshot) = Self::usable(snapshot) else {
            return ValuationAnalysis { status: ValuationStatus::NotAvailable, score: 0 };
        };

        match snapshot.pe_ratio {
            Some(pe) if pe < CHEAP_PE => ValuationAnalysis {
                status: ValuationStatus::Cheap,
                score: SIGNAL_POINTS,
            },
            _ => ValuationAnalysis { status: ValuationStatus::Fair, score: 0 },
        }
    }

    pub fn analyze_profitability(&self, snapshot: Option<&FundamentalSnapshot>) -> ProfitabilityAnalysis {
        let Some(snapshot) = Self::usable(snapshot) else {
            return ProfitabilityAnalysis { quality: ProfitabilityQuality::NotAvailable, score: 0 };
        };

        match snapshot.return_on_equity {
            Some(roe) if roe > GOOD_ROE => ProfitabilityAnalysis {
                quality: ProfitabilityQuality::Good,
                score: SIGNAL_POINTS,
            },
            _ => ProfitabilityAnalysis { quality: ProfitabilityQuality::Average, score: 0 },
        }
    }

    /// Not implemented: always a neutral placeholder.
    pub fn analyze_growth(&self, _snapshot: Option<&FundamentalSnapshot>) -> GrowthAnalysis {
        GrowthAnalysis {
            status: GrowthStatus::Stable,
            score: 0,
            provenance: Provenance::Placeholder,
        }
    }

    /// Not implemented: always a neutral placeholder.
    pub fn analyze_financial_health(&self, _snapshot: Option<&FundamentalSnapshot>) -> HealthAnalysis {
        HealthAnalysis {
            health: HealthStatus::Good,
            score: 0,
            provenance: Provenance::Placeholder,
        }
    }

    /// Mean of the rescaled valuation and profitability scores.
    ///
    /// Growth and health do not contribute. When neither valuation nor
    /// profitability could be evaluated the score is 0.
    pub fn fundamental_score(
        &self,
        valuation: &ValuationAnalysis,
        profitability: &ProfitabilityAnalysis,
    ) -> ScoreRecord<FundamentalRating> {
        if valuation.status == ValuationStatus::NotAvailable
            && profitability.quality == ProfitabilityQuality::NotAvailable
        {
            return ScoreRecord::new(0.0, FundamentalRating::Fair);
        }

        let val_score = Self::rescale(valuation.score);
        let prof_score = Self::rescale(profitability.score);
        let total = ((val_score + prof_score) / 2.0).clamp(0.0, 100.0);
        ScoreRecord::new(round1(total), FundamentalRating::from_score(total))
    }

    /// Map a raw sub-score onto 0-100 via `(score + 3) / 6 * 100`.
    fn rescale(raw: i32) -> f64 {
        (raw as f64 + 3.0) / 6.0 * 100.0
    }

    pub fn analyze(&self, snapshot: Option<&FundamentalSnapshot>) -> FundamentalAnalysis {
        let valuation = self.analyze_valuation(snapshot);
        let profitability = self.analyze_profitability(snapshot);
        let growth = self.analyze_growth(snapshot);
        let health = self.analyze_financial_health(snapshot);
        let score = self.fundamental_score(&valuation, &profitability);

        FundamentalAnalysis {
            valuation,
            profitability,
            growth,
            health,
            score,
            snapshot: snapshot.cloned(),
        }
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
