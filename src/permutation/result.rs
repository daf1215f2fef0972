//! Run results: retained scenarios, exclusion statistics and summary figures

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::ids;
use crate::constraints::Constraint;
use crate::scenario::Scenario;

/// Why scenarios were dropped, per cause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionBreakdown {
    pub lease_tenor_match: u64,
    pub min_funding: u64,
    pub dscr_requirement: u64,
    pub irr_threshold: u64,
    /// Rejected by the calculator (zero denominator, non-finite value, no IRR)
    pub arithmetic: u64,
}

impl ExclusionBreakdown {
    pub fn record(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::LeaseTenorMatch => self.lease_tenor_match += 1,
            Constraint::MinFunding => self.min_funding += 1,
            Constraint::DscrRequirement => self.dscr_requirement += 1,
            Constraint::IrrThreshold => self.irr_threshold += 1,
        }
    }

    pub fn count(&self, constraint: Constraint) -> u64 {
        match constraint {
            Constraint::LeaseTenorMatch => self.lease_tenor_match,
            Constraint::MinFunding => self.min_funding,
            Constraint::DscrRequirement => self.dscr_requirement,
            Constraint::IrrThreshold => self.irr_threshold,
        }
    }

    pub fn constraint_total(&self) -> u64 {
        Constraint::ALL.iter().map(|&c| self.count(c)).sum()
    }

    /// Constraint exclusions plus arithmetic rejections
    pub fn total(&self) -> u64 {
        self.constraint_total() + self.arithmetic
    }
}

/// Headline figures over the retained scenarios
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub best_equity_irr: Option<f64>,
    pub best_blended_dscr: Option<f64>,
    pub average_senior_debt: Option<f64>,
}

impl Summary {
    pub fn from_scenarios(scenarios: &[Scenario]) -> Self {
        let max_of = |id: &str| {
            scenarios
                .iter()
                .filter_map(|s| s.number(id).ok())
                .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        };

        let senior: Vec<f64> = scenarios
            .iter()
            .filter_map(|s| s.number(ids::MAX_SENIOR_DEBT).ok())
            .collect();
        let average_senior_debt = if senior.is_empty() {
            None
        } else {
            Some(senior.iter().sum::<f64>() / senior.len() as f64)
        };

        Self {
            best_equity_irr: max_of(ids::EQUITY_IRR),
            best_blended_dscr: max_of(ids::BLENDED_DSCR),
            average_senior_debt,
        }
    }
}

/// Orderings offered over a result set, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingObjective {
    MaxSeniorRaise,
    MaxEquityIrr,
    MaxBlendedDscr,
    MaxCapitalStack,
}

impl RankingObjective {
    pub fn field(&self) -> &'static str {
        match self {
            RankingObjective::MaxSeniorRaise => ids::MAX_SENIOR_DEBT,
            RankingObjective::MaxEquityIrr => ids::EQUITY_IRR,
            RankingObjective::MaxBlendedDscr => ids::BLENDED_DSCR,
            RankingObjective::MaxCapitalStack => ids::TOTAL_CAPITAL_STACK,
        }
    }
}

/// Descending by `field`; ties and missing values fall back to scenario id
fn compare_descending(a: &Scenario, b: &Scenario, field: &str) -> Ordering {
    let (va, vb) = (a.number_or_nan(field), b.number_or_nan(field));
    vb.partial_cmp(&va)
        .unwrap_or_else(|| va.is_nan().cmp(&vb.is_nan()))
        .then(a.id.cmp(&b.id))
}

/// Write 1-based equity IRR ranks into each scenario (1 = highest IRR)
pub(crate) fn assign_irr_ranking(scenarios: &mut [Scenario]) {
    let mut order: Vec<usize> = (0..scenarios.len()).collect();
    order.sort_by(|&a, &b| compare_descending(&scenarios[a], &scenarios[b], ids::EQUITY_IRR));
    for (rank, index) in order.into_iter().enumerate() {
        scenarios[index].set(ids::EQUITY_IRR_RANKING, (rank + 1) as f64);
    }
}

/// Output of one permutation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermutationResult {
    /// Retained scenarios in generation order
    pub scenarios: Vec<Scenario>,
    /// Size of the full cross product
    pub total_generated: u64,
    /// Retained scenarios whose viability flag is set
    pub viable_count: u64,
    /// Constraint exclusions plus arithmetic rejections
    pub excluded_count: u64,
    /// `excluded / total * 100`, one decimal place
    pub reduction_percent: f64,
    pub exclusions: ExclusionBreakdown,
    /// Generation stopped at `max_permutations`
    pub truncated: bool,
    pub summary: Summary,
}

impl PermutationResult {
    /// Retained scenarios ordered best first for `objective`
    pub fn ranked(&self, objective: RankingObjective) -> Vec<&Scenario> {
        let mut refs: Vec<&Scenario> = self.scenarios.iter().collect();
        refs.sort_by(|a, b| compare_descending(a, b, objective.field()));
        refs
    }

    pub fn viable(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(|s| s.viable)
    }
}

/// `part / total * 100` rounded to one decimal; zero for an empty product
pub fn reduction_percent(excluded: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (excluded as f64 / total as f64 * 1000.0).round() / 10.0
}
