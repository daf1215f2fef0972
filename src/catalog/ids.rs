//! Parameter ids, grouped the same way as the catalog table

// Project
pub const CURRENCY: &str = "Currency_00";
pub const GROSS_IT_LOAD: &str = "GrossITLoad_01";
pub const PUE: &str = "PUE_02";
pub const NET_IT_LOAD: &str = "NetITLoad_03";

// Income & cost
pub const GROSS_MONTHLY_RENT: &str = "GrossMonthlyRent_04";
pub const GROSS_INCOME: &str = "GrossIncome_05";
pub const OPEX: &str = "OPEX_06";
pub const NET_INCOME: &str = "NetIncome_07";
pub const CAPEX_COST_PRICE: &str = "CapexCostPrice_08";
pub const CAPEX_MARKET_RATE: &str = "CapexMarketRate_09";
pub const LAND_PURCHASE_FEES: &str = "LandPurchaseFees_10";
pub const DEVELOPER_PROFIT: &str = "DeveloperProfit_11";
pub const DEVELOPER_MARGIN: &str = "DeveloperMargin_12";
pub const TOTAL_STRUCTURING_FEES: &str = "TotalStructuringFees_13";
pub const TOTAL_PROJECT_MARKET_COSTS: &str = "TotalProjectMarketCosts_14";
pub const TOTAL_PROJECT_INTERNAL_COSTS: &str = "TotalProjectInternalCosts_15";

// Senior debt
pub const TARGET_DSCR_SENIOR: &str = "TargetDSCRSenior_16";
pub const SENIOR_COUPON: &str = "SeniorCoupon_17";
pub const SENIOR_TENOR: &str = "SeniorTenor_18";
pub const AF_SENIOR: &str = "AFSenior_19";
pub const ANNUAL_DEBT_SERVICE_SENIOR: &str = "AnnualDebtServiceSenior_20";
pub const MAX_SENIOR_DEBT: &str = "MaxSeniorDebt_21";
pub const MAX_SENIOR_PCT_OF_COSTS: &str = "MaxSeniorAsPercentageOfCosts_22";
pub const WACD_SENIOR: &str = "WACDSeniorTranche_23";
pub const LEASE_TERM_YEARS: &str = "LeaseTermYears_24";
pub const AF_STRATEGY: &str = "AFStrategy_25";
pub const TYPE_OF_AF_RUN: &str = "TypeOfAFRun_26";
pub const AF_USED_YEARS: &str = "AFUsedYears_27";
pub const AF_CEILING: &str = "AFCeiling_28";
pub const RESIDUAL_AF_VALUE: &str = "ResidualAFValue_29";
pub const PLACEABLE_AT_10Y_AF: &str = "PlaceableAt10YAF_30";
pub const SENIOR_AMORTISATION_TYPE: &str = "SeniorAmortisationType_31";
pub const EFFECTIVE_DSCR_BUFFER: &str = "EffectiveDSCRBuffer_32";

// Mezzanine debt
pub const TARGET_DSCR_MEZZ: &str = "TargetDSCRMezz_33";
pub const MEZZ_COUPON: &str = "MezzCoupon_34";
pub const MEZZ_TENOR_YEARS: &str = "MezzTenorYears_35";
pub const AF_MEZZ: &str = "AnnuityFactorMezz_36";
pub const REMAINING_NOI: &str = "RemainingNOI_37";
pub const ANNUAL_MEZZ_DEBT_SERVICE: &str = "AnnualMezzDebtService_38";
pub const MAX_MEZZ_DEBT: &str = "MaxMezzDebt_39";
pub const MAX_MEZZ_PCT_OF_COSTS: &str = "MaxMezzAsPercentOfCosts_40";
pub const WACD_MEZZ: &str = "WACDMezz_41";
pub const LEASE_TERM_YEARS_MEZZ: &str = "LeaseTermYearsMezz_42";
pub const AF_LOOKUP_MEZZ_AMORTISING: &str = "AFLookupMezzAmortising_43";
pub const AF_MEZZ_FULLY_AMORTISING: &str = "AFValueMezzFullyAmortising_44";
pub const ANNUAL_DEBT_SERVICE_MEZZ: &str = "AnnualDebtServiceMezz_45";
pub const BLENDED_SENIOR_MEZZ_WACD: &str = "BlendedSeniorMezzWACD_46";
pub const BLENDED_DSCR: &str = "BlendedDSCR_47";

// Equity & capital stack
pub const DEBT_HEADROOM: &str = "DebtHeadroom_48";
pub const TARGET_EQUITY_IRR: &str = "TargetEquityIRR_49";
pub const MIN_EQUITY: &str = "MinEquityContribution_50";
pub const DEVELOPER_EQUITY_IRR: &str = "DeveloperEquityIRR_51";
pub const EQUITY_PCT_OF_PROJECT_COST: &str = "EquityAsPercentOfProjectCost_52";
pub const TOTAL_CAPITAL_STACK: &str = "TotalCapitalStack_53";
pub const OVERRAISE_AMOUNT: &str = "OverraiseAmount_54";
pub const RESIDUAL_EQUITY_NEEDED: &str = "ResidualEquityNeeded_55";
pub const EFFECTIVE_EQUITY_VALUE_MULTIPLE: &str = "EffectiveEquityValueMultiple_56";
pub const EQUITY_SALE_UPLIFT: &str = "EquitySaleUplift_57";
pub const EQUITY_SOLD: &str = "EquitySold_58";
pub const EQUITY_RETAINED: &str = "EquityRetained_59";
pub const EQUITY_RETAINED_VALUE: &str = "EquityRetainedValue_60";
pub const RESIDUAL_UPSIDE_CAPTURE: &str = "ResidualUpsideCaptureMechanism_61";
pub const TRS_APPLIED: &str = "TRSApplied_62";
pub const TRS_STRIKE_VALUE: &str = "TRSStrikeValue_63";
pub const TRS_RETAINED_UPSIDE: &str = "TRSRetainedUpside_64";
pub const NOTES_USE_CASE: &str = "NotesUseCase_65";

// Outputs & viability
pub const EQUITY_IRR: &str = "EquityIRR_66";
pub const EQUITY_PCT_OF_PROJECT_COST_FINAL: &str = "EquityAsPercentOfProjectCostFinal_67";
pub const EQUITY_IRR_RANKING: &str = "EquityIRRRanking_68";
pub const TOTAL_EQUITY_VALUE: &str = "TotalEquityValue_69";
pub const PLATFORM_SALE_UPLIFT: &str = "PlatformSaleUplift_70";
pub const PLATFORM_VALUE_REALISED: &str = "PlatformValueRealised_71";
pub const EFFECTIVE_TOTAL_VALUE: &str = "EffectiveTotalValue_72";
pub const TOTAL_CAPITAL_STACK_FINAL: &str = "TotalCapitalStackFinal_73";
pub const SENIOR_PCT_OF_STACK: &str = "SeniorAsPercentOfCapitalStack_74";
pub const MEZZ_PCT_OF_STACK: &str = "MezzAsPercentOfCapitalStack_75";
pub const EQUITY_PCT_OF_STACK: &str = "EquityAsPercentOfCapitalStack_76";
pub const BLENDED_WACD: &str = "BlendedWACD_77";
pub const BLENDED_DSCR_FINAL: &str = "BlendedDSCRFinal_78";
pub const BLENDED_IRR: &str = "BlendedIRR_79";
pub const VIABILITY_FLAG: &str = "ViabilityFlag_80";
