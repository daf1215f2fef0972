//! Capital-stack permutation CLI
//!
//! Expands the configured ranges, evaluates every combination and prints
//! run statistics and the best scenarios. Set RUST_LOG for engine logging.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use capstack_permutations::catalog::ids;
use capstack_permutations::config::loader;
use capstack_permutations::constraints::Thresholds;
use capstack_permutations::{
    EngineConfig, FixedInputs, IncomeBasis, IrrMethod, ParameterCatalog, PermutationEngine, ProjectData,
    RankingObjective, RunOptions, StepPolicy,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IrrArg {
    /// Fixed 2.5x exit after 10 years
    Simplified,
    /// Solve over distributions and a 2.5x exit after 10 years
    CashFlow,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IncomeArg {
    /// Rent is the site's total monthly rent
    Monthly,
    /// Rent is per kW per month
    PerKw,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RankArg {
    SeniorRaise,
    EquityIrr,
    BlendedDscr,
    CapitalStack,
}

impl From<RankArg> for RankingObjective {
    fn from(arg: RankArg) -> Self {
        match arg {
            RankArg::SeniorRaise => RankingObjective::MaxSeniorRaise,
            RankArg::EquityIrr => RankingObjective::MaxEquityIrr,
            RankArg::BlendedDscr => RankingObjective::MaxBlendedDscr,
            RankArg::CapitalStack => RankingObjective::MaxCapitalStack,
        }
    }
}

/// Generate and filter capital-stack permutations
#[derive(Parser, Debug)]
#[command(name = "capstack")]
#[command(version, about, long_about = None)]
struct Args {
    /// Range table (parameter,min,max,step); built-in defaults when omitted
    #[arg(long, value_name = "CSV")]
    ranges: Option<PathBuf>,

    /// Project intake data (JSON)
    #[arg(long, value_name = "JSON")]
    project: Option<PathBuf>,

    /// Cap on retained scenarios
    #[arg(long, default_value_t = capstack_permutations::permutation::DEFAULT_MAX_PERMUTATIONS)]
    max_permutations: usize,

    /// Minimum total raise (senior + mezz + equity) a scenario must reach
    #[arg(long, default_value_t = 0.0)]
    min_funding: f64,

    /// Keep scenarios that fail constraints, flagged not viable
    #[arg(long)]
    all: bool,

    /// Enable the equity IRR filter at this floor (%)
    #[arg(long, value_name = "PCT")]
    irr_floor: Option<f64>,

    #[arg(long, value_enum, default_value = "simplified")]
    irr_method: IrrArg,

    #[arg(long, value_enum, default_value = "monthly")]
    income_basis: IncomeArg,

    /// Step ranges by count instead of repeated addition
    #[arg(long)]
    counted_steps: bool,

    /// Evaluate batches in parallel
    #[arg(long)]
    parallel: bool,

    /// Ordering for the printed scenarios
    #[arg(long, value_enum, default_value = "senior-raise")]
    rank: RankArg,

    /// Number of scenarios to print
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Write the full result as JSON
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        let mut thresholds = Thresholds::default();
        if let Some(floor) = self.irr_floor {
            thresholds.check_irr = true;
            thresholds.irr_floor = floor;
        }

        RunOptions {
            only_viable: !self.all,
            min_funding: self.min_funding,
            max_permutations: self.max_permutations,
            thresholds,
            income_basis: match self.income_basis {
                IncomeArg::Monthly => IncomeBasis::MonthlyRent,
                IncomeArg::PerKw => IncomeBasis::PerKilowatt,
            },
            irr_method: match self.irr_method {
                IrrArg::Simplified => IrrMethod::Simplified,
                IrrArg::CashFlow => IrrMethod::CashFlow {
                    horizon_years: 10,
                    exit_multiple: 2.5,
                },
            },
            step_policy: if self.counted_steps {
                StepPolicy::Counted
            } else {
                StepPolicy::Accumulate
            },
            parallel: self.parallel,
            ..RunOptions::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Capital Stack Permutations v{}", env!("CARGO_PKG_VERSION"));
    println!("================================\n");

    let catalog = ParameterCatalog::global();
    let engine = PermutationEngine::new(catalog).context("Parameter catalog is invalid")?;

    let config = match &args.ranges {
        Some(path) => loader::load_ranges(path, catalog)
            .with_context(|| format!("Failed to load ranges from {}", path.display()))?,
        None => EngineConfig::default_ranges(catalog)?,
    };
    let fixed = FixedInputs::from_catalog(catalog);

    let (fixed, config) = match &args.project {
        Some(path) => {
            let project = ProjectData::from_path(path)
                .with_context(|| format!("Failed to read project data from {}", path.display()))?;
            project.apply(catalog, &fixed, &config)?
        }
        None => (fixed, config),
    };

    println!("Ranged parameters:");
    let options = args.run_options();
    for (id, values) in config.expanded(options.step_policy) {
        println!("  {:<32} {:>4} values", id, values.len());
    }
    println!();

    let start = Instant::now();
    let result = engine.run(&config, &fixed, &options)?;
    println!("Run complete in {:?}", start.elapsed());

    println!("\nSummary:");
    println!("  Total Generated: {}", result.total_generated);
    println!("  Viable: {}", result.viable_count);
    println!("  Excluded: {} ({:.1}% reduction)", result.excluded_count, result.reduction_percent);
    println!("    Lease/tenor mismatch: {}", result.exclusions.lease_tenor_match);
    println!("    Below min funding: {}", result.exclusions.min_funding);
    println!("    Below DSCR floor: {}", result.exclusions.dscr_requirement);
    println!("    Below IRR floor: {}", result.exclusions.irr_threshold);
    println!("    Calculation errors: {}", result.exclusions.arithmetic);
    if result.truncated {
        println!("  Truncated at {} scenarios", result.scenarios.len());
    }
    if let Some(irr) = result.summary.best_equity_irr {
        println!("  Best Equity IRR: {:.2}%", irr);
    }
    if let Some(dscr) = result.summary.best_blended_dscr {
        println!("  Best Blended DSCR: {:.3}", dscr);
    }
    if let Some(senior) = result.summary.average_senior_debt {
        println!("  Average Senior Debt: {:.2}", senior);
    }

    let ranked = result.ranked(args.rank.into());
    if !ranked.is_empty() {
        println!("\nTop {} by {:?}:", args.top.min(ranked.len()), args.rank);
        println!(
            "{:>8} {:>16} {:>16} {:>16} {:>8} {:>8}",
            "ID", "SeniorDebt", "MezzDebt", "CapitalStack", "DSCR", "IRR"
        );
        println!("{}", "-".repeat(78));
        for scenario in ranked.iter().take(args.top) {
            println!(
                "{:>8} {:>16.2} {:>16.2} {:>16.2} {:>8.3} {:>8.2}",
                scenario.id,
                scenario.number_or_nan(ids::MAX_SENIOR_DEBT),
                scenario.number_or_nan(ids::MAX_MEZZ_DEBT),
                scenario.number_or_nan(ids::TOTAL_CAPITAL_STACK),
                scenario.number_or_nan(ids::BLENDED_DSCR),
                scenario.number_or_nan(ids::EQUITY_IRR),
            );
        }
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result)?;
        println!("\nFull results written to: {}", path.display());
    }

    Ok(())
}
