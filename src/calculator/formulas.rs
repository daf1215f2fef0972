//! Capital-stack formulas
//!
//! Rates and DSCR floors follow the catalog's units: coupons, OPEX and the
//! mezzanine DSCR target are percentages, the senior DSCR target is a ratio.

use crate::error::ArithmeticError;

/// How annual gross income is derived from rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum IncomeBasis {
    /// `GrossMonthlyRent * 12`: rent is the total monthly rent for the site
    #[default]
    MonthlyRent,
    /// `GrossMonthlyRent * GrossITLoad * 1000 * 12`: rent is per kW per month, load in MW
    PerKilowatt,
}

/// Divide, failing on a zero denominator
pub fn checked_div(numerator: f64, denominator: f64, field: &'static str) -> Result<f64, ArithmeticError> {
    if denominator == 0.0 {
        return Err(ArithmeticError::DivisionByZero { field });
    }
    Ok(numerator / denominator)
}

/// `part / whole * 100`
pub fn percent_of(part: f64, whole: f64, field: &'static str) -> Result<f64, ArithmeticError> {
    Ok(checked_div(part, whole, field)? * 100.0)
}

pub fn net_it_load(gross_it_load: f64, pue: f64) -> Result<f64, ArithmeticError> {
    checked_div(gross_it_load, pue, "NetITLoad")
}

pub fn gross_income(monthly_rent: f64, gross_it_load: f64, basis: IncomeBasis) -> f64 {
    match basis {
        IncomeBasis::MonthlyRent => monthly_rent * 12.0,
        IncomeBasis::PerKilowatt => monthly_rent * gross_it_load * 1000.0 * 12.0,
    }
}

pub fn net_income(gross_income: f64, opex_pct: f64) -> f64 {
    gross_income * (1.0 - opex_pct / 100.0)
}

/// Present value of 1 per year for `years` at `rate_pct` percent
///
/// Returns `years` for a zero rate.
pub fn annuity_factor(rate_pct: f64, years: f64) -> f64 {
    if rate_pct == 0.0 {
        return years;
    }
    let r = rate_pct / 100.0;
    (1.0 - (1.0 + r).powf(-years)) / r
}

/// Level debt service that keeps coverage at the target DSCR
pub fn annual_debt_service(net_income: f64, target_dscr: f64) -> Result<f64, ArithmeticError> {
    checked_div(net_income, target_dscr, "AnnualDebtServiceSenior")
}

/// `NetIncome / (TargetDSCRSenior * (1 / AF))`, written without the inner reciprocal
pub fn max_senior_debt(net_income: f64, annuity_factor: f64, target_dscr: f64) -> Result<f64, ArithmeticError> {
    checked_div(net_income * annuity_factor, target_dscr, "MaxSeniorDebt")
}

pub fn remaining_noi(net_income: f64, senior_debt_service: f64) -> f64 {
    net_income - senior_debt_service
}

/// Mezzanine debt service sized on the NOI left after senior service
pub fn annual_mezz_debt_service(remaining_noi: f64, target_dscr_mezz_pct: f64) -> Result<f64, ArithmeticError> {
    checked_div(remaining_noi, target_dscr_mezz_pct / 100.0, "AnnualMezzDebtService")
}

/// `RemainingNOI / (TargetDSCRMezz/100 * (1 / AF))`
pub fn max_mezz_debt(
    remaining_noi: f64,
    target_dscr_mezz_pct: f64,
    annuity_factor: f64,
) -> Result<f64, ArithmeticError> {
    checked_div(remaining_noi * annuity_factor, target_dscr_mezz_pct / 100.0, "MaxMezzDebt")
}

pub fn total_capital_stack(senior: f64, mezz: f64, equity: f64) -> f64 {
    senior + mezz + equity
}

/// Net income over total debt service
pub fn blended_dscr(net_income: f64, senior_service: f64, mezz_service: f64) -> Result<f64, ArithmeticError> {
    checked_div(net_income, senior_service + mezz_service, "BlendedDSCR")
}

/// Notional-weighted coupon across the given tranches
pub fn weighted_rate(tranches: &[(f64, f64)], total: f64, field: &'static str) -> Result<f64, ArithmeticError> {
    let weighted: f64 = tranches.iter().map(|(notional, rate)| notional * rate).sum();
    checked_div(weighted, total, field)
}

/// Exit multiple and holding period of the fast IRR approximation
pub const SIMPLIFIED_EXIT_MULTIPLE: f64 = 2.5;
pub const SIMPLIFIED_HOLDING_YEARS: f64 = 10.0;

/// Equity IRR (%) from a fixed 2.5x exit after 10 years
///
/// This is an approximation, not a discounted cash-flow solve; see
/// [`super::irr`] for the full method.
pub fn simplified_equity_irr(equity_investment: f64) -> Result<f64, ArithmeticError> {
    let exit_value = equity_investment * SIMPLIFIED_EXIT_MULTIPLE;
    let multiple = checked_div(exit_value, equity_investment, "EquityIRR")?;
    Ok((multiple.powf(1.0 / SIMPLIFIED_HOLDING_YEARS) - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_income_chain() {
        // 160/month rent, 20% OPEX, 100 MW at PUE 1.2
        let load = net_it_load(100.0, 1.2).unwrap();
        assert_abs_diff_eq!(load, 83.333_333, epsilon = 1e-5);

        let gross = gross_income(160.0, 100.0, IncomeBasis::MonthlyRent);
        assert_abs_diff_eq!(gross, 1920.0, epsilon = 1e-9);

        let net = net_income(gross, 20.0);
        assert_abs_diff_eq!(net, 1536.0, epsilon = 1e-9);
    }

    #[test]
    fn test_per_kilowatt_income() {
        let gross = gross_income(110.0, 10.0, IncomeBasis::PerKilowatt);
        assert_abs_diff_eq!(gross, 13_200_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_pue_is_division_by_zero() {
        assert_eq!(
            net_it_load(100.0, 0.0),
            Err(ArithmeticError::DivisionByZero { field: "NetITLoad" })
        );
    }

    #[test]
    fn test_annuity_factor_zero_rate() {
        for years in [1.0, 7.0, 15.0, 30.0] {
            assert_eq!(annuity_factor(0.0, years), years);
        }
    }

    #[test]
    fn test_annuity_factor_table_value() {
        // 4% over 15 years
        assert_abs_diff_eq!(annuity_factor(4.0, 15.0), 11.118, epsilon = 1e-3);
    }

    #[test]
    fn test_annuity_factor_decreasing_in_rate() {
        let mut previous = annuity_factor(0.25, 20.0);
        for step in 2..=80 {
            let rate = step as f64 * 0.25;
            let af = annuity_factor(rate, 20.0);
            assert!(af < previous, "AF({}) = {} not below {}", rate, af, previous);
            previous = af;
        }
    }

    #[test]
    fn test_senior_sizing_matches_reciprocal_form() {
        let af = annuity_factor(4.0, 15.0);
        let sized = max_senior_debt(1536.0, af, 1.65).unwrap();
        let reference = 1536.0 / (1.65 * (1.0 / af));
        assert_abs_diff_eq!(sized, reference, epsilon = 1e-9);
    }

    #[test]
    fn test_mezz_sizing() {
        let af = annuity_factor(7.0, 15.0);
        let remaining = remaining_noi(1000.0, 500.0);
        let sized = max_mezz_debt(remaining, 200.0, af).unwrap();
        assert_abs_diff_eq!(sized, 250.0 * af, epsilon = 1e-9);

        assert!(max_mezz_debt(remaining, 0.0, af).is_err());
    }

    #[test]
    fn test_blended_dscr() {
        let dscr = blended_dscr(1000.0, 500.0, 250.0).unwrap();
        assert_abs_diff_eq!(dscr, 1.333_333, epsilon = 1e-6);
        assert!(blended_dscr(1000.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_simplified_irr_is_constant() {
        let irr = simplified_equity_irr(10_000_000.0).unwrap();
        assert_abs_diff_eq!(irr, 9.596, epsilon = 1e-3);
        assert_abs_diff_eq!(simplified_equity_irr(1.0).unwrap(), irr, epsilon = 1e-12);
        assert!(simplified_equity_irr(0.0).is_err());
    }

    #[test]
    fn test_weighted_rate() {
        let wacd = weighted_rate(&[(100.0, 4.0), (50.0, 7.0)], 150.0, "WACD").unwrap();
        assert_abs_diff_eq!(wacd, 5.0, epsilon = 1e-12);
    }
}
