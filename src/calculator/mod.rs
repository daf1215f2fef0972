//! Financial calculator: fills every derived field of a scenario
//!
//! Each formula-kind catalog parameter maps to one [`DerivedField`], a named
//! pure function with an explicit input list. Fields are evaluated in
//! [`DerivedField::EVALUATION_ORDER`], which the catalog validates as a
//! dependency order. Outputs depend only on the scenario and the
//! [`CalcSettings`], so scenarios can be evaluated on any thread.

pub mod formulas;
pub mod irr;

pub use formulas::{annuity_factor, IncomeBasis};

use serde::{Deserialize, Serialize};

use crate::catalog::ids::*;
use crate::error::ArithmeticError;
use crate::scenario::Scenario;

/// Equity IRR method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IrrMethod {
    /// Fixed 2.5x exit over 10 years
    Simplified,
    /// Newton-Raphson solve over investment, level distributions and exit
    CashFlow { horizon_years: u32, exit_multiple: f64 },
}

impl Default for IrrMethod {
    fn default() -> Self {
        IrrMethod::Simplified
    }
}

/// Calculation choices shared by every scenario in a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcSettings {
    pub income_basis: IncomeBasis,
    pub irr_method: IrrMethod,
}

/// Named derived-field calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedField {
    NetItLoad,
    GrossIncome,
    NetIncome,
    TotalProjectMarketCosts,
    TotalProjectInternalCosts,
    AfSenior,
    AnnualDebtServiceSenior,
    MaxSeniorDebt,
    MaxSeniorPctOfCosts,
    WacdSenior,
    ResidualAfValue,
    AfMezz,
    RemainingNoi,
    AnnualMezzDebtService,
    MaxMezzDebt,
    MaxMezzPctOfCosts,
    WacdMezz,
    AfLookupMezzAmortising,
    AfMezzFullyAmortising,
    AnnualDebtServiceMezz,
    BlendedSeniorMezzWacd,
    BlendedDscr,
    TotalCapitalStack,
    EquityPctOfProjectCost,
    ResidualEquityNeeded,
    EquitySold,
    EquityRetained,
    EquityRetainedValue,
    EquityIrr,
    EquityPctOfProjectCostFinal,
    TotalEquityValue,
    PlatformValueRealised,
    EffectiveTotalValue,
    TotalCapitalStackFinal,
    SeniorPctOfStack,
    MezzPctOfStack,
    EquityPctOfStack,
    BlendedWacd,
    BlendedDscrFinal,
    BlendedIrr,
}

impl DerivedField {
    /// Dependency order: each field reads only inputs or fields listed before it
    pub const EVALUATION_ORDER: [DerivedField; 40] = [
        DerivedField::NetItLoad,
        DerivedField::GrossIncome,
        DerivedField::NetIncome,
        DerivedField::TotalProjectMarketCosts,
        DerivedField::TotalProjectInternalCosts,
        DerivedField::AfSenior,
        DerivedField::AnnualDebtServiceSenior,
        DerivedField::MaxSeniorDebt,
        DerivedField::MaxSeniorPctOfCosts,
        DerivedField::WacdSenior,
        DerivedField::ResidualAfValue,
        DerivedField::AfMezz,
        DerivedField::RemainingNoi,
        DerivedField::AnnualMezzDebtService,
        DerivedField::MaxMezzDebt,
        DerivedField::MaxMezzPctOfCosts,
        DerivedField::WacdMezz,
        DerivedField::AfLookupMezzAmortising,
        DerivedField::AfMezzFullyAmortising,
        DerivedField::AnnualDebtServiceMezz,
        DerivedField::BlendedSeniorMezzWacd,
        DerivedField::BlendedDscr,
        DerivedField::TotalCapitalStack,
        DerivedField::EquityPctOfProjectCost,
        DerivedField::ResidualEquityNeeded,
        DerivedField::EquitySold,
        DerivedField::EquityRetained,
        DerivedField::EquityRetainedValue,
        DerivedField::EquityIrr,
        DerivedField::EquityPctOfProjectCostFinal,
        DerivedField::TotalEquityValue,
        DerivedField::PlatformValueRealised,
        DerivedField::EffectiveTotalValue,
        DerivedField::TotalCapitalStackFinal,
        DerivedField::SeniorPctOfStack,
        DerivedField::MezzPctOfStack,
        DerivedField::EquityPctOfStack,
        DerivedField::BlendedWacd,
        DerivedField::BlendedDscrFinal,
        DerivedField::BlendedIrr,
    ];

    /// Catalog id this field writes
    pub fn target(self) -> &'static str {
        use DerivedField::*;
        match self {
            NetItLoad => NET_IT_LOAD,
            GrossIncome => GROSS_INCOME,
            NetIncome => NET_INCOME,
            TotalProjectMarketCosts => TOTAL_PROJECT_MARKET_COSTS,
            TotalProjectInternalCosts => TOTAL_PROJECT_INTERNAL_COSTS,
            AfSenior => AF_SENIOR,
            AnnualDebtServiceSenior => ANNUAL_DEBT_SERVICE_SENIOR,
            MaxSeniorDebt => MAX_SENIOR_DEBT,
            MaxSeniorPctOfCosts => MAX_SENIOR_PCT_OF_COSTS,
            WacdSenior => WACD_SENIOR,
            ResidualAfValue => RESIDUAL_AF_VALUE,
            AfMezz => AF_MEZZ,
            RemainingNoi => REMAINING_NOI,
            AnnualMezzDebtService => ANNUAL_MEZZ_DEBT_SERVICE,
            MaxMezzDebt => MAX_MEZZ_DEBT,
            MaxMezzPctOfCosts => MAX_MEZZ_PCT_OF_COSTS,
            WacdMezz => WACD_MEZZ,
            AfLookupMezzAmortising => AF_LOOKUP_MEZZ_AMORTISING,
            AfMezzFullyAmortising => AF_MEZZ_FULLY_AMORTISING,
            AnnualDebtServiceMezz => ANNUAL_DEBT_SERVICE_MEZZ,
            BlendedSeniorMezzWacd => BLENDED_SENIOR_MEZZ_WACD,
            BlendedDscr => BLENDED_DSCR,
            TotalCapitalStack => TOTAL_CAPITAL_STACK,
            EquityPctOfProjectCost => EQUITY_PCT_OF_PROJECT_COST,
            ResidualEquityNeeded => RESIDUAL_EQUITY_NEEDED,
            EquitySold => EQUITY_SOLD,
            EquityRetained => EQUITY_RETAINED,
            EquityRetainedValue => EQUITY_RETAINED_VALUE,
            EquityIrr => EQUITY_IRR,
            EquityPctOfProjectCostFinal => EQUITY_PCT_OF_PROJECT_COST_FINAL,
            TotalEquityValue => TOTAL_EQUITY_VALUE,
            PlatformValueRealised => PLATFORM_VALUE_REALISED,
            EffectiveTotalValue => EFFECTIVE_TOTAL_VALUE,
            TotalCapitalStackFinal => TOTAL_CAPITAL_STACK_FINAL,
            SeniorPctOfStack => SENIOR_PCT_OF_STACK,
            MezzPctOfStack => MEZZ_PCT_OF_STACK,
            EquityPctOfStack => EQUITY_PCT_OF_STACK,
            BlendedWacd => BLENDED_WACD,
            BlendedDscrFinal => BLENDED_DSCR_FINAL,
            BlendedIrr => BLENDED_IRR,
        }
    }

    /// Parameter ids read by this field
    pub fn inputs(self) -> &'static [&'static str] {
        use DerivedField::*;
        match self {
            NetItLoad => &[GROSS_IT_LOAD, PUE],
            GrossIncome => &[GROSS_MONTHLY_RENT, GROSS_IT_LOAD],
            NetIncome => &[GROSS_INCOME, OPEX],
            TotalProjectMarketCosts => &[CAPEX_MARKET_RATE, GROSS_IT_LOAD, LAND_PURCHASE_FEES],
            TotalProjectInternalCosts => &[CAPEX_COST_PRICE, GROSS_IT_LOAD, LAND_PURCHASE_FEES],
            AfSenior => &[SENIOR_COUPON, SENIOR_TENOR],
            AnnualDebtServiceSenior => &[NET_INCOME, TARGET_DSCR_SENIOR],
            MaxSeniorDebt => &[NET_INCOME, AF_SENIOR, TARGET_DSCR_SENIOR],
            MaxSeniorPctOfCosts => &[MAX_SENIOR_DEBT, TOTAL_PROJECT_MARKET_COSTS],
            WacdSenior => &[SENIOR_COUPON],
            ResidualAfValue => &[SENIOR_COUPON, SENIOR_TENOR, AF_USED_YEARS],
            AfMezz => &[MEZZ_COUPON, MEZZ_TENOR_YEARS],
            RemainingNoi => &[NET_INCOME, ANNUAL_DEBT_SERVICE_SENIOR],
            AnnualMezzDebtService => &[REMAINING_NOI, TARGET_DSCR_MEZZ],
            MaxMezzDebt => &[REMAINING_NOI, TARGET_DSCR_MEZZ, AF_MEZZ],
            MaxMezzPctOfCosts => &[MAX_MEZZ_DEBT, TOTAL_PROJECT_MARKET_COSTS],
            WacdMezz => &[MEZZ_COUPON],
            AfLookupMezzAmortising => &[MEZZ_COUPON, LEASE_TERM_YEARS_MEZZ],
            AfMezzFullyAmortising => &[MEZZ_COUPON, MEZZ_TENOR_YEARS],
            AnnualDebtServiceMezz => &[MAX_MEZZ_DEBT, AF_MEZZ_FULLY_AMORTISING],
            BlendedSeniorMezzWacd => &[MAX_SENIOR_DEBT, SENIOR_COUPON, MAX_MEZZ_DEBT, MEZZ_COUPON],
            BlendedDscr => &[NET_INCOME, ANNUAL_DEBT_SERVICE_SENIOR, ANNUAL_MEZZ_DEBT_SERVICE],
            TotalCapitalStack => &[MAX_SENIOR_DEBT, MAX_MEZZ_DEBT, MIN_EQUITY],
            EquityPctOfProjectCost => &[MIN_EQUITY, TOTAL_PROJECT_MARKET_COSTS],
            ResidualEquityNeeded => &[TOTAL_PROJECT_MARKET_COSTS, OVERRAISE_AMOUNT, TOTAL_CAPITAL_STACK],
            EquitySold => &[MIN_EQUITY, EQUITY_SALE_UPLIFT],
            EquityRetained => &[MIN_EQUITY, EQUITY_SOLD],
            EquityRetainedValue => &[EQUITY_RETAINED, EFFECTIVE_EQUITY_VALUE_MULTIPLE],
            EquityIrr => &[MIN_EQUITY, NET_INCOME, ANNUAL_DEBT_SERVICE_SENIOR, ANNUAL_MEZZ_DEBT_SERVICE],
            EquityPctOfProjectCostFinal => &[MIN_EQUITY, RESIDUAL_EQUITY_NEEDED, TOTAL_PROJECT_MARKET_COSTS],
            TotalEquityValue => &[EQUITY_SOLD, EQUITY_RETAINED_VALUE],
            PlatformValueRealised => &[TOTAL_EQUITY_VALUE, PLATFORM_SALE_UPLIFT],
            EffectiveTotalValue => &[TOTAL_EQUITY_VALUE, PLATFORM_VALUE_REALISED],
            TotalCapitalStackFinal => &[TOTAL_CAPITAL_STACK, RESIDUAL_EQUITY_NEEDED],
            SeniorPctOfStack => &[MAX_SENIOR_DEBT, TOTAL_CAPITAL_STACK],
            MezzPctOfStack => &[MAX_MEZZ_DEBT, TOTAL_CAPITAL_STACK],
            EquityPctOfStack => &[MIN_EQUITY, TOTAL_CAPITAL_STACK],
            BlendedWacd => &[MAX_SENIOR_DEBT, SENIOR_COUPON, MAX_MEZZ_DEBT, MEZZ_COUPON, TOTAL_CAPITAL_STACK],
            BlendedDscrFinal => &[BLENDED_DSCR],
            BlendedIrr => &[
                MAX_SENIOR_DEBT,
                SENIOR_COUPON,
                MAX_MEZZ_DEBT,
                MEZZ_COUPON,
                MIN_EQUITY,
                EQUITY_IRR,
                TOTAL_CAPITAL_STACK,
            ],
        }
    }

    /// Compute this field from values already present in the scenario
    pub fn compute(self, s: &Scenario, settings: &CalcSettings) -> Result<f64, ArithmeticError> {
        use formulas::*;
        use DerivedField::*;

        let value = match self {
            NetItLoad => net_it_load(s.number(GROSS_IT_LOAD)?, s.number(PUE)?)?,
            GrossIncome => gross_income(
                s.number(GROSS_MONTHLY_RENT)?,
                s.number(GROSS_IT_LOAD)?,
                settings.income_basis,
            ),
            NetIncome => net_income(s.number(GROSS_INCOME)?, s.number(OPEX)?),
            TotalProjectMarketCosts => {
                s.number(CAPEX_MARKET_RATE)? * s.number(GROSS_IT_LOAD)? + s.number(LAND_PURCHASE_FEES)?
            }
            TotalProjectInternalCosts => {
                s.number(CAPEX_COST_PRICE)? * s.number(GROSS_IT_LOAD)? + s.number(LAND_PURCHASE_FEES)?
            }
            AfSenior => annuity_factor(s.number(SENIOR_COUPON)?, s.number(SENIOR_TENOR)?),
            AnnualDebtServiceSenior => annual_debt_service(s.number(NET_INCOME)?, s.number(TARGET_DSCR_SENIOR)?)?,
            MaxSeniorDebt => max_senior_debt(
                s.number(NET_INCOME)?,
                s.number(AF_SENIOR)?,
                s.number(TARGET_DSCR_SENIOR)?,
            )?,
            MaxSeniorPctOfCosts => percent_of(
                s.number(MAX_SENIOR_DEBT)?,
                s.number(TOTAL_PROJECT_MARKET_COSTS)?,
                "MaxSeniorAsPercentageOfCosts",
            )?,
            WacdSenior => s.number(SENIOR_COUPON)?,
            ResidualAfValue => {
                // AF over the tenor left once the used years have run off
                let remaining = (s.number(SENIOR_TENOR)? - s.number(AF_USED_YEARS)?).max(0.0);
                annuity_factor(s.number(SENIOR_COUPON)?, remaining)
            }
            AfMezz => annuity_factor(s.number(MEZZ_COUPON)?, s.number(MEZZ_TENOR_YEARS)?),
            RemainingNoi => remaining_noi(s.number(NET_INCOME)?, s.number(ANNUAL_DEBT_SERVICE_SENIOR)?),
            AnnualMezzDebtService => {
                annual_mezz_debt_service(s.number(REMAINING_NOI)?, s.number(TARGET_DSCR_MEZZ)?)?
            }
            MaxMezzDebt => max_mezz_debt(
                s.number(REMAINING_NOI)?,
                s.number(TARGET_DSCR_MEZZ)?,
                s.number(AF_MEZZ)?,
            )?,
            MaxMezzPctOfCosts => percent_of(
                s.number(MAX_MEZZ_DEBT)?,
                s.number(TOTAL_PROJECT_MARKET_COSTS)?,
                "MaxMezzAsPercentOfCosts",
            )?,
            WacdMezz => s.number(MEZZ_COUPON)?,
            AfLookupMezzAmortising => annuity_factor(s.number(MEZZ_COUPON)?, s.number(LEASE_TERM_YEARS_MEZZ)?),
            AfMezzFullyAmortising => annuity_factor(s.number(MEZZ_COUPON)?, s.number(MEZZ_TENOR_YEARS)?),
            AnnualDebtServiceMezz => checked_div(
                s.number(MAX_MEZZ_DEBT)?,
                s.number(AF_MEZZ_FULLY_AMORTISING)?,
                "AnnualDebtServiceMezz",
            )?,
            BlendedSeniorMezzWacd => {
                let senior = s.number(MAX_SENIOR_DEBT)?;
                let mezz = s.number(MAX_MEZZ_DEBT)?;
                weighted_rate(
                    &[(senior, s.number(SENIOR_COUPON)?), (mezz, s.number(MEZZ_COUPON)?)],
                    senior + mezz,
                    "BlendedSeniorMezzWACD",
                )?
            }
            BlendedDscr => blended_dscr(
                s.number(NET_INCOME)?,
                s.number(ANNUAL_DEBT_SERVICE_SENIOR)?,
                s.number(ANNUAL_MEZZ_DEBT_SERVICE)?,
            )?,
            TotalCapitalStack => total_capital_stack(
                s.number(MAX_SENIOR_DEBT)?,
                s.number(MAX_MEZZ_DEBT)?,
                s.number(MIN_EQUITY)?,
            ),
            EquityPctOfProjectCost => percent_of(
                s.number(MIN_EQUITY)?,
                s.number(TOTAL_PROJECT_MARKET_COSTS)?,
                "EquityAsPercentOfProjectCost",
            )?,
            ResidualEquityNeeded => {
                let need = s.number(TOTAL_PROJECT_MARKET_COSTS)? + s.number(OVERRAISE_AMOUNT)?;
                (need - s.number(TOTAL_CAPITAL_STACK)?).max(0.0)
            }
            EquitySold => s.number(MIN_EQUITY)? * s.number(EQUITY_SALE_UPLIFT)? / 100.0,
            EquityRetained => s.number(MIN_EQUITY)? - s.number(EQUITY_SOLD)?,
            EquityRetainedValue => s.number(EQUITY_RETAINED)? * s.number(EFFECTIVE_EQUITY_VALUE_MULTIPLE)?,
            EquityIrr => {
                let equity = s.number(MIN_EQUITY)?;
                match settings.irr_method {
                    IrrMethod::Simplified => simplified_equity_irr(equity)?,
                    IrrMethod::CashFlow { horizon_years, exit_multiple } => {
                        let distribution = s.number(NET_INCOME)?
                            - s.number(ANNUAL_DEBT_SERVICE_SENIOR)?
                            - s.number(ANNUAL_MEZZ_DEBT_SERVICE)?;
                        irr::cash_flow_equity_irr(equity, distribution, horizon_years, exit_multiple)?
                    }
                }
            }
            EquityPctOfProjectCostFinal => percent_of(
                s.number(MIN_EQUITY)? + s.number(RESIDUAL_EQUITY_NEEDED)?,
                s.number(TOTAL_PROJECT_MARKET_COSTS)?,
                "EquityAsPercentOfProjectCostFinal",
            )?,
            TotalEquityValue => s.number(EQUITY_SOLD)? + s.number(EQUITY_RETAINED_VALUE)?,
            PlatformValueRealised => s.number(TOTAL_EQUITY_VALUE)? * s.number(PLATFORM_SALE_UPLIFT)? / 100.0,
            EffectiveTotalValue => s.number(TOTAL_EQUITY_VALUE)? + s.number(PLATFORM_VALUE_REALISED)?,
            TotalCapitalStackFinal => s.number(TOTAL_CAPITAL_STACK)? + s.number(RESIDUAL_EQUITY_NEEDED)?,
            SeniorPctOfStack => percent_of(
                s.number(MAX_SENIOR_DEBT)?,
                s.number(TOTAL_CAPITAL_STACK)?,
                "SeniorAsPercentOfCapitalStack",
            )?,
            MezzPctOfStack => percent_of(
                s.number(MAX_MEZZ_DEBT)?,
                s.number(TOTAL_CAPITAL_STACK)?,
                "MezzAsPercentOfCapitalStack",
            )?,
            EquityPctOfStack => percent_of(
                s.number(MIN_EQUITY)?,
                s.number(TOTAL_CAPITAL_STACK)?,
                "EquityAsPercentOfCapitalStack",
            )?,
            BlendedWacd => weighted_rate(
                &[
                    (s.number(MAX_SENIOR_DEBT)?, s.number(SENIOR_COUPON)?),
                    (s.number(MAX_MEZZ_DEBT)?, s.number(MEZZ_COUPON)?),
                ],
                s.number(TOTAL_CAPITAL_STACK)?,
                "BlendedWACD",
            )?,
            BlendedDscrFinal => s.number(BLENDED_DSCR)?,
            BlendedIrr => weighted_rate(
                &[
                    (s.number(MAX_SENIOR_DEBT)?, s.number(SENIOR_COUPON)?),
                    (s.number(MAX_MEZZ_DEBT)?, s.number(MEZZ_COUPON)?),
                    (s.number(MIN_EQUITY)?, s.number(EQUITY_IRR)?),
                ],
                s.number(TOTAL_CAPITAL_STACK)?,
                "BlendedIRR",
            )?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ArithmeticError::NonFinite { field: self.target() })
        }
    }
}

/// Stateless evaluator applying the registry to a scenario
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialCalculator {
    settings: CalcSettings,
}

impl FinancialCalculator {
    pub fn new(settings: CalcSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CalcSettings {
        &self.settings
    }

    /// Fill every derived field in dependency order
    ///
    /// Stops at the first arithmetic failure; the scenario is then only
    /// partially filled and must be discarded.
    pub fn evaluate(&self, scenario: &mut Scenario) -> Result<(), ArithmeticError> {
        for field in DerivedField::EVALUATION_ORDER {
            let value = field.compute(scenario, &self.settings)?;
            scenario.set(field.target(), value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterCatalog;
    use crate::config::FixedInputs;
    use approx::assert_abs_diff_eq;

    fn base_scenario() -> Scenario {
        let fixed = FixedInputs::from_catalog(ParameterCatalog::global());
        let mut scenario = Scenario::new(1, fixed.values().clone());
        scenario.set(GROSS_IT_LOAD, 100.0);
        scenario.set(PUE, 1.2);
        scenario.set(GROSS_MONTHLY_RENT, 160.0);
        scenario.set(OPEX, 20.0);
        scenario.set(SENIOR_COUPON, 4.0);
        scenario.set(SENIOR_TENOR, 15.0);
        scenario.set(TARGET_DSCR_SENIOR, 1.65);
        scenario.set(MEZZ_COUPON, 7.0);
        scenario.set(MEZZ_TENOR_YEARS, 15.0);
        scenario.set(TARGET_DSCR_MEZZ, 70.0);
        scenario
    }

    #[test]
    fn test_evaluate_fills_every_derived_field() {
        let mut scenario = base_scenario();
        FinancialCalculator::default().evaluate(&mut scenario).unwrap();

        for field in DerivedField::EVALUATION_ORDER {
            assert!(scenario.get(field.target()).is_some(), "{} not filled", field.target());
        }
    }

    #[test]
    fn test_income_and_senior_sizing() {
        let mut scenario = base_scenario();
        FinancialCalculator::default().evaluate(&mut scenario).unwrap();

        assert_abs_diff_eq!(scenario.number(NET_IT_LOAD).unwrap(), 83.333_333, epsilon = 1e-5);
        assert_abs_diff_eq!(scenario.number(GROSS_INCOME).unwrap(), 1920.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scenario.number(NET_INCOME).unwrap(), 1536.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scenario.number(AF_SENIOR).unwrap(), 11.118, epsilon = 1e-3);

        let expected_senior = 1536.0 * annuity_factor(4.0, 15.0) / 1.65;
        assert_abs_diff_eq!(scenario.number(MAX_SENIOR_DEBT).unwrap(), expected_senior, epsilon = 1e-6);
    }

    #[test]
    fn test_capital_stack_adds_up() {
        let mut scenario = base_scenario();
        FinancialCalculator::default().evaluate(&mut scenario).unwrap();

        let senior = scenario.number(MAX_SENIOR_DEBT).unwrap();
        let mezz = scenario.number(MAX_MEZZ_DEBT).unwrap();
        let equity = scenario.number(MIN_EQUITY).unwrap();
        assert_abs_diff_eq!(scenario.number(TOTAL_CAPITAL_STACK).unwrap(), senior + mezz + equity, epsilon = 1e-6);

        let pct_sum = scenario.number(SENIOR_PCT_OF_STACK).unwrap()
            + scenario.number(MEZZ_PCT_OF_STACK).unwrap()
            + scenario.number(EQUITY_PCT_OF_STACK).unwrap();
        assert_abs_diff_eq!(pct_sum, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blended_dscr_from_tranche_services() {
        let mut scenario = base_scenario();
        scenario.set(TARGET_DSCR_SENIOR, 2.0);
        scenario.set(TARGET_DSCR_MEZZ, 200.0);
        FinancialCalculator::default().evaluate(&mut scenario).unwrap();

        // Senior takes half the NOI, mezz a quarter
        assert_abs_diff_eq!(scenario.number(BLENDED_DSCR).unwrap(), 4.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            scenario.number(ANNUAL_DEBT_SERVICE_MEZZ).unwrap(),
            scenario.number(ANNUAL_MEZZ_DEBT_SERVICE).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_denominators_reject_scenario() {
        let calculator = FinancialCalculator::default();

        let mut scenario = base_scenario();
        scenario.set(PUE, 0.0);
        assert_eq!(
            calculator.evaluate(&mut scenario),
            Err(ArithmeticError::DivisionByZero { field: "NetITLoad" })
        );

        let mut scenario = base_scenario();
        scenario.set(TARGET_DSCR_SENIOR, 0.0);
        assert!(matches!(
            calculator.evaluate(&mut scenario),
            Err(ArithmeticError::DivisionByZero { .. })
        ));

        let mut scenario = base_scenario();
        scenario.set(TARGET_DSCR_MEZZ, 0.0);
        assert!(calculator.evaluate(&mut scenario).is_err());

        let mut scenario = base_scenario();
        scenario.set(MIN_EQUITY, 0.0);
        assert_eq!(
            calculator.evaluate(&mut scenario),
            Err(ArithmeticError::DivisionByZero { field: "EquityIRR" })
        );
    }

    #[test]
    fn test_cash_flow_irr_method() {
        let mut simplified = base_scenario();
        simplified.set(MIN_EQUITY, 1000.0);
        let mut solved = simplified.clone();

        FinancialCalculator::default().evaluate(&mut simplified).unwrap();
        FinancialCalculator::new(CalcSettings {
            irr_method: IrrMethod::CashFlow { horizon_years: 10, exit_multiple: 2.5 },
            ..Default::default()
        })
        .evaluate(&mut solved)
        .unwrap();

        assert_abs_diff_eq!(simplified.number(EQUITY_IRR).unwrap(), 9.596, epsilon = 1e-3);
        assert!(solved.number(EQUITY_IRR).unwrap().is_finite());
    }

    #[test]
    fn test_missing_input_is_reported() {
        let mut scenario = Scenario::new(1, Default::default());
        scenario.set(GROSS_IT_LOAD, 100.0);
        assert_eq!(
            FinancialCalculator::default().evaluate(&mut scenario),
            Err(ArithmeticError::MissingInput(PUE.to_string()))
        );
    }
}
