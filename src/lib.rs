//! Capital-stack permutation engine for data-centre financing
//!
//! This library provides:
//! - A fixed catalog of named financial parameters and their formulas
//! - Range expansion and a lazy cross product over ranged parameters
//! - Per-scenario debt sizing, capital stack and equity IRR calculations
//! - Viability constraints and aggregated run statistics

pub mod catalog;
pub mod calculator;
pub mod config;
pub mod constraints;
pub mod error;
pub mod permutation;
pub mod scenario;

// Re-export commonly used types
pub use catalog::{ParamValue, ParameterCatalog};
pub use calculator::{FinancialCalculator, IncomeBasis, IrrMethod};
pub use config::{EngineConfig, FixedInputs, ProjectData, RangeSpec, StepPolicy};
pub use constraints::{Constraint, ConstraintFilter, Thresholds};
pub use error::{ArithmeticError, ConfigurationError, EngineError};
pub use permutation::{CancellationToken, PermutationEngine, PermutationResult, RankingObjective, RunOptions};
pub use scenario::Scenario;
