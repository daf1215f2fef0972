//! Permutation engine: expand ranges, evaluate every combination, filter, aggregate

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::combinations::{Combination, CombinationGenerator};
use super::result::{assign_irr_ranking, reduction_percent, ExclusionBreakdown, PermutationResult, Summary};
use crate::calculator::{CalcSettings, FinancialCalculator, IncomeBasis, IrrMethod};
use crate::catalog::{ids, ParamValue, ParameterCatalog};
use crate::config::{EngineConfig, FixedInputs, StepPolicy};
use crate::constraints::{Constraint, ConstraintFilter, Thresholds};
use crate::error::{ArithmeticError, CombinationCount, ConfigurationError, EngineError};
use crate::scenario::Scenario;

/// Default hard limit on the cross-product size
pub const DEFAULT_COMBINATION_CEILING: u64 = 5_000_000;

/// Default cap on retained scenarios
pub const DEFAULT_MAX_PERMUTATIONS: usize = 10_000;

/// Combinations evaluated between cancellation checks
const BATCH_SIZE: usize = 4096;

/// Options for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Drop scenarios that fail a constraint; otherwise keep them flagged not viable
    pub only_viable: bool,
    /// Minimum total raise (senior + mezz + equity); replaces `thresholds.min_funding`
    pub min_funding: f64,
    /// Cap on retained scenarios; generation stops once reached
    pub max_permutations: usize,
    pub thresholds: Thresholds,
    pub income_basis: IncomeBasis,
    pub irr_method: IrrMethod,
    pub step_policy: StepPolicy,
    /// Runs whose cross product exceeds this fail before generating anything
    pub combination_ceiling: u64,
    /// Evaluate each batch on the rayon pool
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            only_viable: true,
            min_funding: 0.0,
            max_permutations: DEFAULT_MAX_PERMUTATIONS,
            thresholds: Thresholds::default(),
            income_basis: IncomeBasis::default(),
            irr_method: IrrMethod::default(),
            step_policy: StepPolicy::default(),
            combination_ceiling: DEFAULT_COMBINATION_CEILING,
            parallel: false,
        }
    }
}

impl RunOptions {
    fn effective_thresholds(&self) -> Thresholds {
        Thresholds {
            min_funding: self.min_funding,
            ..self.thresholds
        }
    }

    fn calc_settings(&self) -> CalcSettings {
        CalcSettings {
            income_basis: self.income_basis,
            irr_method: self.irr_method,
        }
    }
}

/// Shared flag for stopping a run between batches
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

enum Outcome {
    Retained(Scenario),
    Excluded(Constraint),
    Rejected(ArithmeticError),
}

/// Per-run state shared by every combination
struct Pass<'a> {
    base: &'a BTreeMap<String, ParamValue>,
    calculator: FinancialCalculator,
    filter: ConstraintFilter,
    only_viable: bool,
}

impl Pass<'_> {
    fn evaluate(&self, index: u64, combination: Combination) -> Outcome {
        let mut values = self.base.clone();
        for (id, value) in combination {
            values.insert(id, ParamValue::Number(value));
        }

        let mut scenario = Scenario::new(index + 1, values);
        if let Err(err) = self.calculator.evaluate(&mut scenario) {
            return Outcome::Rejected(err);
        }

        let verdict = self.filter.evaluate(&scenario);
        scenario.viable = verdict.is_ok();
        scenario.set(ids::VIABILITY_FLAG, scenario.viable);

        match verdict {
            Err(constraint) if self.only_viable => Outcome::Excluded(constraint),
            _ => Outcome::Retained(scenario),
        }
    }
}

/// Runs permutation passes against a validated catalog
#[derive(Debug, Clone, Copy)]
pub struct PermutationEngine<'c> {
    catalog: &'c ParameterCatalog,
}

impl PermutationEngine<'static> {
    /// Engine over the built-in catalog
    pub fn with_global_catalog() -> Result<Self, EngineError> {
        Self::new(ParameterCatalog::global())
    }
}

impl<'c> PermutationEngine<'c> {
    /// Validates the catalog's formula references before any run
    pub fn new(catalog: &'c ParameterCatalog) -> Result<Self, EngineError> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &'c ParameterCatalog {
        self.catalog
    }

    pub fn run(
        &self,
        config: &EngineConfig,
        fixed: &FixedInputs,
        options: &RunOptions,
    ) -> Result<PermutationResult, EngineError> {
        self.run_with_cancel(config, fixed, options, &CancellationToken::new())
    }

    /// Run, checking `cancel` between batches
    pub fn run_with_cancel(
        &self,
        config: &EngineConfig,
        fixed: &FixedInputs,
        options: &RunOptions,
        cancel: &CancellationToken,
    ) -> Result<PermutationResult, EngineError> {
        self.check_inputs(config, fixed)?;

        let mut generator = CombinationGenerator::new(config.expanded(options.step_policy));
        let total = match generator.total() {
            Some(total) if total <= options.combination_ceiling => total,
            requested => {
                let requested = requested.map_or(CombinationCount::Overflow, CombinationCount::Exact);
                warn!(
                    "Refusing {} combinations (ceiling {})",
                    requested, options.combination_ceiling
                );
                return Err(EngineError::ResourceLimit {
                    requested,
                    ceiling: options.combination_ceiling,
                });
            }
        };
        info!(
            "Generating {} permutations over {} ranged parameters",
            total,
            generator.keys().len()
        );

        let pass = Pass {
            base: fixed.values(),
            calculator: FinancialCalculator::new(options.calc_settings()),
            filter: ConstraintFilter::new(options.effective_thresholds()),
            only_viable: options.only_viable,
        };

        let mut scenarios: Vec<Scenario> = Vec::new();
        let mut exclusions = ExclusionBreakdown::default();
        let mut processed: u64 = 0;
        let mut truncated = false;

        'batches: loop {
            if cancel.is_cancelled() {
                warn!("Run cancelled after {} combinations", processed);
                return Err(EngineError::Cancelled { processed });
            }
            if scenarios.len() >= options.max_permutations {
                truncated = generator.position() < total;
                break;
            }

            let start = generator.position();
            let batch: Vec<(u64, Combination)> = generator
                .by_ref()
                .take(BATCH_SIZE)
                .enumerate()
                .map(|(i, combination)| (start + i as u64, combination))
                .collect();
            if batch.is_empty() {
                break;
            }

            let outcomes: Vec<Outcome> = if options.parallel {
                batch
                    .into_par_iter()
                    .map(|(index, combination)| pass.evaluate(index, combination))
                    .collect()
            } else {
                batch
                    .into_iter()
                    .map(|(index, combination)| pass.evaluate(index, combination))
                    .collect()
            };

            for outcome in outcomes {
                if scenarios.len() >= options.max_permutations {
                    truncated = true;
                    break 'batches;
                }
                processed += 1;
                match outcome {
                    Outcome::Retained(scenario) => scenarios.push(scenario),
                    Outcome::Excluded(constraint) => exclusions.record(constraint),
                    Outcome::Rejected(err) => {
                        debug!("Combination rejected: {}", err);
                        exclusions.arithmetic += 1;
                    }
                }
            }

            debug!(
                "Processed {}/{} combinations, {} retained",
                processed,
                total,
                scenarios.len()
            );
        }

        if truncated {
            warn!(
                "Stopped at {} retained scenarios after {} of {} combinations",
                scenarios.len(),
                processed,
                total
            );
        }

        assign_irr_ranking(&mut scenarios);

        let viable_count = scenarios.iter().filter(|s| s.viable).count() as u64;
        let excluded_count = exclusions.total();
        let result = PermutationResult {
            summary: Summary::from_scenarios(&scenarios),
            scenarios,
            total_generated: total,
            viable_count,
            excluded_count,
            reduction_percent: reduction_percent(excluded_count, total),
            exclusions,
            truncated,
        };

        info!(
            "{} viable, {} excluded ({}% reduction) of {} generated",
            result.viable_count, result.excluded_count, result.reduction_percent, result.total_generated
        );
        Ok(result)
    }

    /// Every input needs a fixed value or a range; ranges only on numeric inputs
    fn check_inputs(&self, config: &EngineConfig, fixed: &FixedInputs) -> Result<(), ConfigurationError> {
        for entry in config.ranges() {
            let definition = self
                .catalog
                .get(&entry.id)
                .map_err(|_| ConfigurationError::UnknownParameter(entry.id.clone()))?;
            if !definition.is_numeric_input() {
                return Err(ConfigurationError::NotRangeable(entry.id.clone()));
            }
        }

        for definition in self.catalog.all() {
            if definition.is_formula() || config.range(definition.id).is_some() {
                continue;
            }
            match fixed.get(definition.id) {
                Some(value) if definition.accepts(value) => {}
                Some(_) => {
                    return Err(ConfigurationError::TypeMismatch {
                        id: definition.id.to_string(),
                        expected: definition.expected_type(),
                    })
                }
                None => return Err(ConfigurationError::MissingInput(definition.id.to_string())),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangeSpec;
    use crate::permutation::RankingObjective;
    use approx::assert_abs_diff_eq;

    fn engine() -> PermutationEngine<'static> {
        PermutationEngine::with_global_catalog().unwrap()
    }

    fn fixed() -> FixedInputs {
        FixedInputs::from_catalog(ParameterCatalog::global())
    }

    /// 8 combinations: 4 match lease to tenor, 2 of those clear the DSCR floor
    fn config() -> EngineConfig {
        EngineConfig::from_ranges(
            ParameterCatalog::global(),
            [
                (ids::LEASE_TERM_YEARS, RangeSpec::new(10.0, 15.0, 5.0)),
                (ids::SENIOR_TENOR, RangeSpec::new(10.0, 15.0, 5.0)),
                (ids::TARGET_DSCR_SENIOR, RangeSpec::fixed(2.0)),
                (ids::TARGET_DSCR_MEZZ, RangeSpec::new(100.0, 200.0, 100.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_viable_run_counts() {
        let result = engine().run(&config(), &fixed(), &RunOptions::default()).unwrap();

        assert_eq!(result.total_generated, 8);
        assert_eq!(result.viable_count, 2);
        assert_eq!(result.excluded_count, 6);
        assert_eq!(result.exclusions.lease_tenor_match, 4);
        assert_eq!(result.exclusions.dscr_requirement, 2);
        assert_eq!(result.reduction_percent, 75.0);
        assert!(!result.truncated);
        assert_eq!(result.viable_count + result.excluded_count, result.total_generated);

        // Ids are product positions: lease and tenor equal, mezz DSCR 200
        let ids: Vec<u64> = result.scenarios.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 8]);
    }

    #[test]
    fn test_viable_scenarios_are_complete_and_consistent() {
        let catalog = ParameterCatalog::global();
        let result = engine().run(&config(), &fixed(), &RunOptions::default()).unwrap();

        for scenario in &result.scenarios {
            assert!(scenario.viable);
            assert!(scenario.is_complete(catalog), "missing {:?}", scenario.missing(catalog));
            assert_eq!(
                scenario.number(ids::LEASE_TERM_YEARS).unwrap(),
                scenario.number(ids::SENIOR_TENOR).unwrap()
            );
            assert!(scenario.number(ids::BLENDED_DSCR).unwrap() >= 1.25);
            assert_eq!(scenario.get(ids::VIABILITY_FLAG), Some(&ParamValue::Flag(true)));
        }
    }

    #[test]
    fn test_keep_non_viable() {
        let options = RunOptions {
            only_viable: false,
            ..RunOptions::default()
        };
        let result = engine().run(&config(), &fixed(), &options).unwrap();

        assert_eq!(result.scenarios.len(), 8);
        assert_eq!(result.viable_count, 2);
        assert_eq!(result.excluded_count, 0);
        assert_eq!(
            result.scenarios[0].get(ids::VIABILITY_FLAG),
            Some(&ParamValue::Flag(false))
        );
    }

    #[test]
    fn test_max_permutations_truncates() {
        let options = RunOptions {
            only_viable: false,
            max_permutations: 3,
            ..RunOptions::default()
        };
        let result = engine().run(&config(), &fixed(), &options).unwrap();

        assert_eq!(result.scenarios.len(), 3);
        assert!(result.truncated);
        assert_eq!(result.total_generated, 8);

        // Cap equal to the full product is not a truncation
        let exact = RunOptions {
            only_viable: false,
            max_permutations: 8,
            ..RunOptions::default()
        };
        assert!(!engine().run(&config(), &fixed(), &exact).unwrap().truncated);
    }

    #[test]
    fn test_ceiling_checked_before_generation() {
        let options = RunOptions {
            combination_ceiling: 4,
            ..RunOptions::default()
        };
        let err = engine().run(&config(), &fixed(), &options).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ResourceLimit {
                requested: CombinationCount::Exact(8),
                ceiling: 4
            }
        ));
    }

    #[test]
    fn test_overflowing_product_is_resource_limit() {
        let catalog = ParameterCatalog::global();
        let wide = RangeSpec::new(0.0, 99_999.0, 1.0);
        let config = EngineConfig::from_ranges(
            catalog,
            [
                (ids::LAND_PURCHASE_FEES, wide.clone()),
                (ids::TOTAL_STRUCTURING_FEES, wide.clone()),
                (ids::OVERRAISE_AMOUNT, wide.clone()),
                (ids::TRS_STRIKE_VALUE, wide),
            ],
        )
        .unwrap();
        let err = engine().run(&config, &fixed(), &RunOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ResourceLimit {
                requested: CombinationCount::Overflow,
                ..
            }
        ));
    }

    #[test]
    fn test_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let err = engine()
            .run_with_cancel(&config(), &fixed(), &RunOptions::default(), &token)
            .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled { processed: 0 }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let catalog = ParameterCatalog::global();
        let config = config()
            .with_range(catalog, ids::OPEX, RangeSpec::new(10.0, 30.0, 1.0))
            .unwrap()
            .with_range(catalog, ids::GROSS_MONTHLY_RENT, RangeSpec::new(100.0, 300.0, 10.0))
            .unwrap();
        let sequential = engine()
            .run(&config, &fixed(), &RunOptions { only_viable: false, ..RunOptions::default() })
            .unwrap();
        let parallel = engine()
            .run(
                &config,
                &fixed(),
                &RunOptions {
                    only_viable: false,
                    parallel: true,
                    ..RunOptions::default()
                },
            )
            .unwrap();

        assert_eq!(sequential.total_generated, 8 * 21 * 21);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_arithmetic_rejections_counted_separately() {
        let catalog = ParameterCatalog::global();
        let config = config()
            .with_range(catalog, ids::PUE, RangeSpec::new(0.0, 1.2, 1.2))
            .unwrap();
        let result = engine().run(&config, &fixed(), &RunOptions::default()).unwrap();

        assert_eq!(result.total_generated, 16);
        assert_eq!(result.exclusions.arithmetic, 8);
        assert_eq!(result.exclusions.constraint_total(), 6);
        assert_eq!(result.excluded_count, 14);
        assert_eq!(result.viable_count, 2);
    }

    #[test]
    fn test_min_funding_filter() {
        let options = RunOptions {
            min_funding: f64::MAX,
            ..RunOptions::default()
        };
        let result = engine().run(&config(), &fixed(), &options).unwrap();
        assert_eq!(result.viable_count, 0);
        assert_eq!(result.exclusions.min_funding, 4);
        assert_eq!(result.reduction_percent, 100.0);
    }

    #[test]
    fn test_irr_filter_toggle() {
        // Simplified IRR is ~9.6% for every scenario
        let strict = RunOptions {
            thresholds: Thresholds {
                check_irr: true,
                irr_floor: 10.0,
                ..Thresholds::default()
            },
            ..RunOptions::default()
        };
        let result = engine().run(&config(), &fixed(), &strict).unwrap();
        assert_eq!(result.viable_count, 0);
        assert_eq!(result.exclusions.irr_threshold, 2);
    }

    #[test]
    fn test_ranking_and_summary() {
        let result = engine().run(&config(), &fixed(), &RunOptions::default()).unwrap();

        let ranks: Vec<f64> = result
            .scenarios
            .iter()
            .map(|s| s.number(ids::EQUITY_IRR_RANKING).unwrap())
            .collect();
        assert_eq!(ranks, vec![1.0, 2.0]);

        let best = result.ranked(RankingObjective::MaxBlendedDscr);
        assert_abs_diff_eq!(best[0].number(ids::BLENDED_DSCR).unwrap(), 4.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.summary.best_equity_irr.unwrap(), 9.596, epsilon = 1e-3);
    }

    #[test]
    fn test_counted_steps_change_expansion() {
        let catalog = ParameterCatalog::global();
        let config = config()
            .with_range(catalog, ids::OPEX, RangeSpec::new(0.0, 0.3, 0.1))
            .unwrap();
        let accumulate = engine().run(&config, &fixed(), &RunOptions::default()).unwrap();
        let counted = engine()
            .run(
                &config,
                &fixed(),
                &RunOptions {
                    step_policy: StepPolicy::Counted,
                    ..RunOptions::default()
                },
            )
            .unwrap();
        assert_eq!(accumulate.total_generated, 24);
        assert_eq!(counted.total_generated, 32);
    }

    #[test]
    fn test_missing_fixed_input_fails_fast() {
        let empty: FixedInputs = serde_json::from_str(r#"{"values": {}}"#).unwrap();
        let err = engine().run(&config(), &empty, &RunOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigurationError::MissingInput(_))
        ));
    }
}
