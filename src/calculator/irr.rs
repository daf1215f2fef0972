//! Equity IRR from an explicit cash-flow schedule
//!
//! Newton-Raphson on the NPV function, falling back to bisection when the
//! derivative vanishes or the iteration fails to settle.

use crate::error::ArithmeticError;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;

/// Periodic IRR of `cashflows` (index = period), as a decimal
///
/// Returns `None` when the flows never change sign or no root lies in
/// [-99%, 1000%].
pub fn solve_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let mut rate = 0.10;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            return bisect(cashflows);
        }

        let next = (rate - npv / slope).clamp(RATE_FLOOR, RATE_CEILING);
        if (next - rate).abs() < TOLERANCE {
            // Settling on a clamp bound is not a root
            let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
            if npv_with_slope(cashflows, next).0.abs() <= 1e-6 * scale {
                return Some(next);
            }
            return bisect(cashflows);
        }
        rate = next;
    }

    bisect(cashflows)
}

fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut slope = 0.0;
    for (t, &cf) in cashflows.iter().enumerate() {
        let growth = (1.0 + rate).powi(t as i32);
        npv += cf / growth;
        if t > 0 {
            slope -= t as f64 * cf / (growth * (1.0 + rate));
        }
    }
    (npv, slope)
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEILING;
    let mut npv_low = npv(cashflows, low);
    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Annual equity schedule: investment at t0, level distributions, exit in the final year
pub fn equity_cash_flows(
    equity_investment: f64,
    annual_distribution: f64,
    horizon_years: u32,
    exit_multiple: f64,
) -> Vec<f64> {
    let mut flows = Vec::with_capacity(horizon_years as usize + 1);
    flows.push(-equity_investment);
    flows.extend(std::iter::repeat(annual_distribution).take(horizon_years as usize));
    if let Some(last) = flows.last_mut() {
        if horizon_years > 0 {
            *last += equity_investment * exit_multiple;
        }
    }
    flows
}

/// Equity IRR (%) solved over the full distribution schedule
pub fn cash_flow_equity_irr(
    equity_investment: f64,
    annual_distribution: f64,
    horizon_years: u32,
    exit_multiple: f64,
) -> Result<f64, ArithmeticError> {
    if equity_investment == 0.0 {
        return Err(ArithmeticError::DivisionByZero { field: "EquityIRR" });
    }
    let flows = equity_cash_flows(equity_investment, annual_distribution, horizon_years, exit_multiple);
    solve_irr(&flows)
        .map(|rate| rate * 100.0)
        .ok_or(ArithmeticError::IrrNotFound)
}
