//! Viability constraints applied to calculated scenarios
//!
//! Each predicate is independent and can be switched off in [`Thresholds`].
//! A scenario is viable when every enabled predicate holds.

use serde::{Deserialize, Serialize};

use crate::catalog::ids;
use crate::scenario::Scenario;

/// Default floor for blended debt service coverage
pub const DEFAULT_DSCR_FLOOR: f64 = 1.25;

/// Default floor for equity IRR (%)
pub const DEFAULT_IRR_FLOOR: f64 = 8.0;

/// Individual viability checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Lease term equals senior tenor
    LeaseTenorMatch,
    /// Senior, mezzanine and equity together cover the minimum funding requirement
    MinFunding,
    /// Blended DSCR at or above the floor
    DscrRequirement,
    /// Equity IRR at or above the floor
    IrrThreshold,
}

impl Constraint {
    pub const ALL: [Constraint; 4] = [
        Constraint::LeaseTenorMatch,
        Constraint::MinFunding,
        Constraint::DscrRequirement,
        Constraint::IrrThreshold,
    ];
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Constraint::LeaseTenorMatch => "lease/tenor match",
            Constraint::MinFunding => "minimum funding",
            Constraint::DscrRequirement => "DSCR requirement",
            Constraint::IrrThreshold => "IRR threshold",
        };
        f.write_str(name)
    }
}

/// Which constraints run, and their floors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lease_tenor_match: bool,
    /// Minimum total raise (senior + mezz + equity); `<= 0` disables the check
    pub min_funding: f64,
    pub check_dscr: bool,
    pub dscr_floor: f64,
    pub check_irr: bool,
    pub irr_floor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lease_tenor_match: true,
            min_funding: 0.0,
            check_dscr: true,
            dscr_floor: DEFAULT_DSCR_FLOOR,
            check_irr: false,
            irr_floor: DEFAULT_IRR_FLOOR,
        }
    }
}

/// Lease term must equal senior tenor exactly
pub fn lease_tenor_match(scenario: &Scenario) -> bool {
    scenario.number_or_nan(ids::LEASE_TERM_YEARS) == scenario.number_or_nan(ids::SENIOR_TENOR)
}

/// Senior, mezzanine and equity must together raise `min_required`
///
/// Always met when `min_required <= 0`.
pub fn min_funding_met(scenario: &Scenario, min_required: f64) -> bool {
    if min_required <= 0.0 {
        return true;
    }
    let raised = scenario.number_or_nan(ids::MAX_SENIOR_DEBT)
        + scenario.number_or_nan(ids::MAX_MEZZ_DEBT)
        + scenario.number_or_nan(ids::MIN_EQUITY);
    raised >= min_required
}

pub fn dscr_requirements_met(scenario: &Scenario, floor: f64) -> bool {
    scenario.number_or_nan(ids::BLENDED_DSCR) >= floor
}

pub fn irr_threshold_met(scenario: &Scenario, floor: f64) -> bool {
    scenario.number_or_nan(ids::EQUITY_IRR) >= floor
}

/// Applies the enabled constraints to calculated scenarios
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintFilter {
    thresholds: Thresholds,
}

impl ConstraintFilter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// First failing constraint, if any
    pub fn evaluate(&self, scenario: &Scenario) -> Result<(), Constraint> {
        let t = &self.thresholds;
        if t.lease_tenor_match && !lease_tenor_match(scenario) {
            return Err(Constraint::LeaseTenorMatch);
        }
        if !min_funding_met(scenario, t.min_funding) {
            return Err(Constraint::MinFunding);
        }
        if t.check_dscr && !dscr_requirements_met(scenario, t.dscr_floor) {
            return Err(Constraint::DscrRequirement);
        }
        if t.check_irr && !irr_threshold_met(scenario, t.irr_floor) {
            return Err(Constraint::IrrThreshold);
        }
        Ok(())
    }

    pub fn is_viable(&self, scenario: &Scenario) -> bool {
        self.evaluate(scenario).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scenario(lease: f64, tenor: f64, senior: f64, dscr: f64, irr: f64) -> Scenario {
        let mut s = Scenario::new(1, BTreeMap::new());
        s.set(ids::LEASE_TERM_YEARS, lease);
        s.set(ids::SENIOR_TENOR, tenor);
        s.set(ids::MAX_SENIOR_DEBT, senior);
        s.set(ids::MAX_MEZZ_DEBT, 0.0);
        s.set(ids::MIN_EQUITY, 0.0);
        s.set(ids::BLENDED_DSCR, dscr);
        s.set(ids::EQUITY_IRR, irr);
        s
    }

    #[test]
    fn test_lease_tenor_mismatch_excluded() {
        let filter = ConstraintFilter::default();
        assert_eq!(
            filter.evaluate(&scenario(10.0, 15.0, 1e8, 1.5, 9.6)),
            Err(Constraint::LeaseTenorMatch)
        );
        assert!(filter.is_viable(&scenario(15.0, 15.0, 1e8, 1.5, 9.6)));
    }

    #[test]
    fn test_min_funding_disabled_at_zero() {
        let s = scenario(15.0, 15.0, 100.0, 1.5, 9.6);
        assert!(min_funding_met(&s, 0.0));
        assert!(min_funding_met(&s, -5.0));
        assert!(min_funding_met(&s, 100.0));
        assert!(!min_funding_met(&s, 100.01));
    }

    #[test]
    fn test_min_funding_counts_whole_stack() {
        // Senior alone is short of 100; senior + mezz + equity is 110
        let mut s = scenario(15.0, 15.0, 60.0, 1.5, 9.6);
        s.set(ids::MAX_MEZZ_DEBT, 30.0);
        s.set(ids::MIN_EQUITY, 20.0);
        assert!(min_funding_met(&s, 100.0));
        assert!(min_funding_met(&s, 110.0));
        assert!(!min_funding_met(&s, 110.5));

        let filter = ConstraintFilter::new(Thresholds {
            min_funding: 100.0,
            ..Thresholds::default()
        });
        assert!(filter.is_viable(&s));
    }

    #[test]
    fn test_dscr_floor_is_inclusive() {
        let filter = ConstraintFilter::default();
        assert!(filter.is_viable(&scenario(15.0, 15.0, 1.0, 1.25, 0.0)));
        assert_eq!(
            filter.evaluate(&scenario(15.0, 15.0, 1.0, 1.2499, 0.0)),
            Err(Constraint::DscrRequirement)
        );
    }

    #[test]
    fn test_irr_threshold_off_by_default() {
        let low_irr = scenario(15.0, 15.0, 1.0, 2.0, 3.0);
        assert!(ConstraintFilter::default().is_viable(&low_irr));

        let strict = ConstraintFilter::new(Thresholds {
            check_irr: true,
            ..Thresholds::default()
        });
        assert_eq!(strict.evaluate(&low_irr), Err(Constraint::IrrThreshold));
    }

    #[test]
    fn test_first_failure_reported() {
        let filter = ConstraintFilter::new(Thresholds {
            min_funding: 1e9,
            ..Thresholds::default()
        });
        // Fails funding and DSCR; funding is checked first
        assert_eq!(
            filter.evaluate(&scenario(15.0, 15.0, 1.0, 0.5, 0.0)),
            Err(Constraint::MinFunding)
        );
    }

    #[test]
    fn test_disabled_checks_pass_missing_values() {
        let filter = ConstraintFilter::new(Thresholds {
            lease_tenor_match: false,
            check_dscr: false,
            ..Thresholds::default()
        });
        assert!(filter.is_viable(&Scenario::new(1, BTreeMap::new())));
    }
}
