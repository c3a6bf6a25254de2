//! Read-only views over a finished result set: dashboard figures, sector
//! averages, filtered rankings, profile portfolios and side-by-side comparisons.

use analysis_core::{Action, AnalysisError, AssetAnalysis, TrendDirection};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Picks returned for an investor profile
pub const PORTFOLIO_SIZE: usize = 10;
pub const MIN_COMPARE: usize = 2;
pub const MAX_COMPARE: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestAsset {
    pub symbol: String,
    pub display_symbol: String,
    pub name: String,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub count: usize,
    pub mean_score: f64,
    pub strong_buy_count: usize,
    /// Share of STRONG BUY results, 0-100
    pub strong_buy_pct: f64,
    pub best: Option<BestAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub sector: String,
    pub mean_score: f64,
    pub count: usize,
}

/// One line of a ranking or portfolio table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub symbol: String,
    pub display_symbol: String,
    pub name: String,
    pub sector: String,
    pub subsector: String,
    pub final_score: f64,
    pub technical_score: f64,
    pub fundamental_score: f64,
    pub price: f64,
    pub change_1m_pct: Option<f64>,
    pub action: Action,
}

impl From<&AssetAnalysis> for RankingRow {
    fn from(a: &AssetAnalysis) -> Self {
        Self {
            symbol: a.asset.symbol.clone(),
            display_symbol: a.asset.display_symbol.clone(),
            name: a.asset.name.clone(),
            sector: a.asset.sector.clone(),
            subsector: a.asset.subsector.clone(),
            final_score: a.recommendation.final_score,
            technical_score: a.technical.score.score,
            fundamental_score: a.fundamental.score.score,
            price: a.price.current,
            change_1m_pct: a.price.change_1m_pct,
            action: a.recommendation.action,
        }
    }
}

/// Ranking filter. Empty sets match everything; the score range is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingFilter {
    #[serde(default)]
    pub subsectors: Vec<String>,
    #[serde(default = "RankingFilter::default_min")]
    pub min_score: f64,
    #[serde(default = "RankingFilter::default_max")]
    pub max_score: f64,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl RankingFilter {
    fn default_min() -> f64 {
        0.0
    }

    fn default_max() -> f64 {
        100.0
    }

    pub fn matches(&self, analysis: &AssetAnalysis) -> bool {
        let score = analysis.recommendation.final_score;
        (self.subsectors.is_empty() || self.subsectors.contains(&analysis.asset.subsector))
            && score >= self.min_score
            && score <= self.max_score
            && (self.actions.is_empty() || self.actions.contains(&analysis.recommendation.action))
    }
}

impl Default for RankingFilter {
    fn default() -> Self {
        Self {
            subsectors: Vec::new(),
            min_score: Self::default_min(),
            max_score: Self::default_max(),
            actions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorProfile {
    /// Strong fundamentals first
    Conservative,
    /// Balanced on the blended score
    Moderate,
    /// Technical momentum first
    Aggressive,
}

impl InvestorProfile {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" | "conservador" => Some(InvestorProfile::Conservative),
            "moderate" | "moderado" => Some(InvestorProfile::Moderate),
            "aggressive" | "arrojado" => Some(InvestorProfile::Aggressive),
            _ => None,
        }
    }

    /// Score the profile ranks by, and the minimum it requires
    fn criterion(&self, analysis: &AssetAnalysis) -> (f64, f64) {
        match self {
            InvestorProfile::Conservative => (analysis.fundamental.score.score, 70.0),
            InvestorProfile::Moderate => (analysis.recommendation.final_score, 65.0),
            InvestorProfile::Aggressive => (analysis.technical.score.score, 60.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorCount {
    pub sector: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSuggestion {
    pub profile: InvestorProfile,
    pub picks: Vec<RankingRow>,
    /// Sector mix of `picks`, first-appearance order
    pub sector_distribution: Vec<SectorCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub symbol: String,
    pub display_symbol: String,
    pub name: String,
    pub subsector: String,
    pub price: f64,
    pub change_1m_pct: Option<f64>,
    pub final_score: f64,
    pub technical_score: f64,
    pub fundamental_score: f64,
    pub trend: TrendDirection,
    pub rsi: f64,
    pub action: Action,
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn dashboard_summary(results: &[AssetAnalysis]) -> DashboardSummary {
    let count = results.len();
    if count == 0 {
        return DashboardSummary {
            count: 0,
            mean_score: 0.0,
            strong_buy_count: 0,
            strong_buy_pct: 0.0,
            best: None,
        };
    }

    let mean_score = results.iter().map(|a| a.final_score()).sum::<f64>() / count as f64;
    let strong_buy_count = results
        .iter()
        .filter(|a| a.recommendation.action == Action::StrongBuy)
        .count();

    // First of equal scores wins
    let best = results
        .iter()
        .fold(None::<&AssetAnalysis>, |best, a| match best {
            Some(b) if b.final_score() >= a.final_score() => Some(b),
            _ => Some(a),
        })
        .map(|a| BestAsset {
            symbol: a.asset.symbol.clone(),
            display_symbol: a.asset.display_symbol.clone(),
            name: a.asset.name.clone(),
            final_score: a.final_score(),
        });

    DashboardSummary {
        count,
        mean_score,
        strong_buy_count,
        strong_buy_pct: strong_buy_count as f64 / count as f64 * 100.0,
        best,
    }
}

/// Mean final score and count per sector, in order of first appearance.
pub fn sector_summary(results: &[AssetAnalysis]) -> Vec<SectorSummary> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for analysis in results {
        let sector = &analysis.asset.sector;
        match groups.iter_mut().find(|(s, _)| s == sector) {
            Some((_, scores)) => scores.push(analysis.final_score()),
            None => groups.push((sector.clone(), vec![analysis.final_score()])),
        }
    }

    groups
        .into_iter()
        .map(|(sector, scores)| SectorSummary {
            mean_score: scores.iter().sum::<f64>() / scores.len() as f64,
            count: scores.len(),
            sector,
        })
        .collect()
}

pub fn rankings(results: &[AssetAnalysis], filter: &RankingFilter) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = results
        .iter()
        .filter(|a| filter.matches(a))
        .map(RankingRow::from)
        .collect();
    rows.sort_by(|a, b| descending(a.final_score, b.final_score));
    rows
}

pub fn portfolio(results: &[AssetAnalysis], profile: InvestorProfile) -> PortfolioSuggestion {
    let mut eligible: Vec<(f64, &AssetAnalysis)> = results
        .iter()
        .filter_map(|a| {
            let (score, minimum) = profile.criterion(a);
            (score >= minimum).then_some((score, a))
        })
        .collect();
    eligible.sort_by(|a, b| descending(a.0, b.0));

    let picks: Vec<RankingRow> = eligible
        .into_iter()
        .take(PORTFOLIO_SIZE)
        .map(|(_, a)| RankingRow::from(a))
        .collect();

    let mut sector_distribution: Vec<SectorCount> = Vec::new();
    for pick in &picks {
        match sector_distribution.iter_mut().find(|c| c.sector == pick.sector) {
            Some(entry) => entry.count += 1,
            None => sector_distribution.push(SectorCount {
                sector: pick.sector.clone(),
                count: 1,
            }),
        }
    }

    PortfolioSuggestion {
        profile,
        picks,
        sector_distribution,
    }
}

/// Side-by-side rows for 2 to 5 assets, in the order requested. Symbols match
/// either the provider symbol or the display symbol.
pub fn compare(results: &[AssetAnalysis], symbols: &[&str]) -> Result<Vec<ComparisonRow>, AnalysisError> {
    if !(MIN_COMPARE..=MAX_COMPARE).contains(&symbols.len()) {
        return Err(AnalysisError::InvalidData(format!(
            "compare needs {} to {} assets, got {}",
            MIN_COMPARE,
            MAX_COMPARE,
            symbols.len()
        )));
    }

    symbols
        .iter()
        .map(|&symbol| -> Result<ComparisonRow, AnalysisError> {
            let a = results
                .iter()
                .find(|a| a.asset.symbol == symbol || a.asset.display_symbol == symbol)
                .ok_or_else(|| AnalysisError::UnknownTicker(symbol.to_string()))?;
            Ok(ComparisonRow {
                symbol: a.asset.symbol.clone(),
                display_symbol: a.asset.display_symbol.clone(),
                name: a.asset.name.clone(),
                subsector: a.asset.subsector.clone(),
                price: a.price.current,
                change_1m_pct: a.price.change_1m_pct,
                final_score: a.recommendation.final_score,
                technical_score: a.technical.score.score,
                fundamental_score: a.fundamental.score.score,
                trend: a.technical.trend.direction,
                rsi: a.technical.momentum.rsi,
                action: a.recommendation.action,
            })
        })
        .collect()
}
