//! The parameter table, in category then declaration order

use super::definition::{Category, FormulaRef, ParameterDefinition, ParameterKind};
use super::ids::*;
use crate::calculator::DerivedField;

fn number(
    id: &'static str,
    name: &'static str,
    category: Category,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Number { min, max, step, default },
    }
}

fn select(
    id: &'static str,
    name: &'static str,
    category: Category,
    options: &'static [&'static str],
    default: &'static str,
) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Select { options, default },
    }
}

fn boolean(id: &'static str, name: &'static str, category: Category, default: bool) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Boolean { default },
    }
}

fn text(id: &'static str, name: &'static str, category: Category) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Text { default: "" },
    }
}

fn derived(id: &'static str, name: &'static str, category: Category, field: DerivedField) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Formula(FormulaRef::Derived(field)),
    }
}

fn assigned(id: &'static str, name: &'static str, category: Category, formula: FormulaRef) -> ParameterDefinition {
    ParameterDefinition {
        id,
        name,
        category,
        kind: ParameterKind::Formula(formula),
    }
}

/// Build the full parameter table
pub(super) fn definitions() -> Vec<ParameterDefinition> {
    use Category::*;
    use DerivedField as D;

    vec![
        // Project & basic parameters
        select(CURRENCY, "Currency", Project, &["EUR", "USD", "GBP"], "EUR"),
        number(GROSS_IT_LOAD, "Gross IT Load (MW)", Project, 0.1, 100.0, 0.1, 10.0),
        number(PUE, "PUE", Project, 1.0, 2.5, 0.01, 1.15),
        derived(NET_IT_LOAD, "Net IT Load (MW)", Project, D::NetItLoad),

        // Income & cost parameters
        number(GROSS_MONTHLY_RENT, "Gross Monthly Rent (€/kW)", Financial, 50.0, 500.0, 5.0, 110.0),
        derived(GROSS_INCOME, "Gross Income", Financial, D::GrossIncome),
        number(OPEX, "OPEX (%)", Financial, 0.0, 50.0, 1.0, 15.0),
        derived(NET_INCOME, "Net Income", Financial, D::NetIncome),
        number(CAPEX_COST_PRICE, "Capex Cost Price (€/kW)", Financial, 1000.0, 20000.0, 100.0, 7000.0),
        number(CAPEX_MARKET_RATE, "Capex Market Rate (€/kW)", Financial, 1000.0, 25000.0, 100.0, 8000.0),
        number(LAND_PURCHASE_FEES, "Land Purchase & Fees (€)", Financial, 0.0, 100_000_000.0, 100_000.0, 5_000_000.0),
        number(DEVELOPER_PROFIT, "Developer Profit (%)", Financial, 0.0, 50.0, 1.0, 15.0),
        number(DEVELOPER_MARGIN, "Developer Margin (%)", Financial, 0.0, 50.0, 1.0, 20.0),
        number(TOTAL_STRUCTURING_FEES, "Total Structuring Fees (€)", Financial, 0.0, 10_000_000.0, 10_000.0, 500_000.0),
        derived(TOTAL_PROJECT_MARKET_COSTS, "Total Project Market Costs", Financial, D::TotalProjectMarketCosts),
        derived(TOTAL_PROJECT_INTERNAL_COSTS, "Total Project Internal Costs", Financial, D::TotalProjectInternalCosts),

        // Senior debt parameters
        number(TARGET_DSCR_SENIOR, "Target DSCR Senior", Senior, 1.0, 3.0, 0.05, 1.35),
        number(SENIOR_COUPON, "Senior Coupon (%)", Senior, 0.0, 20.0, 0.25, 6.5),
        number(SENIOR_TENOR, "Senior Tenor (Years)", Senior, 1.0, 30.0, 1.0, 7.0),
        derived(AF_SENIOR, "Annuity Factor Senior", Senior, D::AfSenior),
        derived(ANNUAL_DEBT_SERVICE_SENIOR, "Annual Debt Service Senior", Senior, D::AnnualDebtServiceSenior),
        derived(MAX_SENIOR_DEBT, "Max Senior Debt", Senior, D::MaxSeniorDebt),
        derived(MAX_SENIOR_PCT_OF_COSTS, "Max Senior as % of Costs", Senior, D::MaxSeniorPctOfCosts),
        derived(WACD_SENIOR, "WACD Senior Tranche (%)", Senior, D::WacdSenior),
        number(LEASE_TERM_YEARS, "Lease Term Years", Senior, 1.0, 30.0, 1.0, 10.0),
        select(AF_STRATEGY, "AF Strategy", Senior, &["Bullet", "Linear", "Annuity", "Custom"], "Linear"),
        select(TYPE_OF_AF_RUN, "Type of AF Run", Senior, &["Standard", "Conservative", "Aggressive"], "Standard"),
        number(AF_USED_YEARS, "AF Used Years", Senior, 1.0, 30.0, 1.0, 7.0),
        number(AF_CEILING, "AF Ceiling", Senior, 0.0, 100.0, 1.0, 80.0),
        derived(RESIDUAL_AF_VALUE, "Residual AF Value", Senior, D::ResidualAfValue),
        boolean(PLACEABLE_AT_10Y_AF, "Placeable at 10Y AF", Senior, true),
        select(SENIOR_AMORTISATION_TYPE, "Senior Amortisation Type", Senior, &["Bullet", "Linear", "Annuity"], "Linear"),
        number(EFFECTIVE_DSCR_BUFFER, "Effective DSCR Buffer (%)", Senior, 0.0, 50.0, 1.0, 10.0),

        // Mezzanine debt parameters
        number(TARGET_DSCR_MEZZ, "Target DSCR - Mezz (%)", Mezzanine, 50.0, 300.0, 5.0, 115.0),
        number(MEZZ_COUPON, "Mezz Coupon (%)", Mezzanine, 0.0, 30.0, 0.5, 12.0),
        number(MEZZ_TENOR_YEARS, "Mezz Tenor Years", Mezzanine, 1.0, 15.0, 1.0, 5.0),
        derived(AF_MEZZ, "Annuity Factor - Mezz", Mezzanine, D::AfMezz),
        derived(REMAINING_NOI, "Remaining NOI (£)", Mezzanine, D::RemainingNoi),
        derived(ANNUAL_MEZZ_DEBT_SERVICE, "Annual Mezz Debt Service (£)", Mezzanine, D::AnnualMezzDebtService),
        derived(MAX_MEZZ_DEBT, "Max Mezz Debt (£)", Mezzanine, D::MaxMezzDebt),
        derived(MAX_MEZZ_PCT_OF_COSTS, "Max Mezz as % of Costs (%)", Mezzanine, D::MaxMezzPctOfCosts),
        derived(WACD_MEZZ, "WACD - Mezz (%)", Mezzanine, D::WacdMezz),
        number(LEASE_TERM_YEARS_MEZZ, "Lease Term Years - Mezz", Mezzanine, 1.0, 30.0, 1.0, 10.0),
        derived(AF_LOOKUP_MEZZ_AMORTISING, "AF Lookup - Mezz (Amortising)", Mezzanine, D::AfLookupMezzAmortising),
        derived(AF_MEZZ_FULLY_AMORTISING, "AF Value - Mezz (Fully Amortising)", Mezzanine, D::AfMezzFullyAmortising),
        derived(ANNUAL_DEBT_SERVICE_MEZZ, "Annual Debt Service (£) - Mezz", Mezzanine, D::AnnualDebtServiceMezz),
        derived(BLENDED_SENIOR_MEZZ_WACD, "Blended Senior + Mezz WACD (%)", Mezzanine, D::BlendedSeniorMezzWacd),
        derived(BLENDED_DSCR, "Blended DSCR", Mezzanine, D::BlendedDscr),

        // Equity & capital stack parameters
        number(DEBT_HEADROOM, "Debt Headroom (%)", Equity, 0.0, 100.0, 5.0, 20.0),
        number(TARGET_EQUITY_IRR, "Target Equity IRR (%)", Equity, 0.0, 50.0, 1.0, 18.0),
        number(MIN_EQUITY, "Min Equity Contribution (£)", Equity, 0.0, 1_000_000_000.0, 100_000.0, 10_000_000.0),
        number(DEVELOPER_EQUITY_IRR, "Developer Equity IRR (%)", Equity, 0.0, 50.0, 1.0, 25.0),
        derived(EQUITY_PCT_OF_PROJECT_COST, "Equity as % of Project Cost", Equity, D::EquityPctOfProjectCost),
        derived(TOTAL_CAPITAL_STACK, "Total Capital Stack (£)", Equity, D::TotalCapitalStack),
        number(OVERRAISE_AMOUNT, "Overraise Amount (£)", Equity, 0.0, 100_000_000.0, 100_000.0, 0.0),
        derived(RESIDUAL_EQUITY_NEEDED, "Residual Equity Needed (£)", Equity, D::ResidualEquityNeeded),
        number(EFFECTIVE_EQUITY_VALUE_MULTIPLE, "Effective Equity Value Multiple", Equity, 1.0, 5.0, 0.1, 1.5),
        number(EQUITY_SALE_UPLIFT, "Equity Sale Uplift (%)", Equity, 0.0, 100.0, 5.0, 20.0),
        derived(EQUITY_SOLD, "Equity Sold (£)", Equity, D::EquitySold),
        derived(EQUITY_RETAINED, "Equity Retained (£)", Equity, D::EquityRetained),
        derived(EQUITY_RETAINED_VALUE, "Equity Retained Value (£)", Equity, D::EquityRetainedValue),
        select(
            RESIDUAL_UPSIDE_CAPTURE,
            "Residual Upside Capture Mechanism",
            Equity,
            &["None", "Promote", "Waterfall", "Ratchet"],
            "Promote",
        ),
        boolean(TRS_APPLIED, "TRS Applied?", Equity, false),
        number(TRS_STRIKE_VALUE, "TRS Strike Value (£)", Equity, 0.0, 1_000_000_000.0, 100_000.0, 0.0),
        number(TRS_RETAINED_UPSIDE, "TRS Retained Upside (%)", Equity, 0.0, 100.0, 5.0, 50.0),
        text(NOTES_USE_CASE, "Notes / Use Case", Equity),

        // Output & viability parameters
        derived(EQUITY_IRR, "Equity IRR (%)", Outputs, D::EquityIrr),
        derived(
            EQUITY_PCT_OF_PROJECT_COST_FINAL,
            "EQUITY as % of Project Cost",
            Outputs,
            D::EquityPctOfProjectCostFinal,
        ),
        assigned(EQUITY_IRR_RANKING, "Equity IRR Ranking", Outputs, FormulaRef::Ranking),
        derived(TOTAL_EQUITY_VALUE, "Total Equity Value (£)", Outputs, D::TotalEquityValue),
        number(PLATFORM_SALE_UPLIFT, "Platform Sale Uplift (%)", Outputs, 0.0, 100.0, 5.0, 30.0),
        derived(PLATFORM_VALUE_REALISED, "Platform Value Realised (£)", Outputs, D::PlatformValueRealised),
        derived(EFFECTIVE_TOTAL_VALUE, "Effective Total Value (£)", Outputs, D::EffectiveTotalValue),
        derived(TOTAL_CAPITAL_STACK_FINAL, "Total Capital Stack (£)", Outputs, D::TotalCapitalStackFinal),
        derived(SENIOR_PCT_OF_STACK, "Senior as % of Capital Stack", Outputs, D::SeniorPctOfStack),
        derived(MEZZ_PCT_OF_STACK, "Mezz as % of Capital Stack", Outputs, D::MezzPctOfStack),
        derived(EQUITY_PCT_OF_STACK, "Equity as % of Capital Stack", Outputs, D::EquityPctOfStack),
        derived(BLENDED_WACD, "Blended WACD (%)", Outputs, D::BlendedWacd),
        derived(BLENDED_DSCR_FINAL, "Blended DSCR", Outputs, D::BlendedDscrFinal),
        derived(BLENDED_IRR, "Blended IRR (%)", Outputs, D::BlendedIrr),
        assigned(VIABILITY_FLAG, "Viability Flag", Outputs, FormulaRef::AllConstraintsMet),
    ]
}
