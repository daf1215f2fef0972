//! Error types for catalog setup, range configuration and engine runs

use thiserror::Error;

/// Errors surfaced to the caller of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Parameter id is not in the catalog
    #[error("parameter not found: {0}")]
    NotFound(String),

    /// Invalid catalog, range or fixed-input setup
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Theoretical combination count is above the configured ceiling
    #[error("{requested} combinations requested, ceiling is {ceiling}")]
    ResourceLimit {
        /// `None` when the product overflows u64
        requested: CombinationCount,
        ceiling: u64,
    },

    /// Run was cancelled through its token
    #[error("permutation run cancelled after {processed} combinations")]
    Cancelled { processed: u64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Size of a requested cross product, which may not fit in u64
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationCount {
    Exact(u64),
    Overflow,
}

impl std::fmt::Display for CombinationCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombinationCount::Exact(n) => write!(f, "{}", n),
            CombinationCount::Overflow => write!(f, "more than {}", u64::MAX),
        }
    }
}

/// Setup errors; these fail fast before any scenario is generated
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A formula reads a parameter id that is not in the catalog
    #[error("formula for {field} references unknown parameter {reference}")]
    DanglingReference { field: String, reference: String },

    /// A derived field reads another derived field that is evaluated later
    #[error("formula for {field} reads {reference} before it is calculated")]
    OutOfOrderReference { field: String, reference: String },

    /// Formula parameter with no producer in the calculator registry
    #[error("formula parameter {0} has no calculator")]
    MissingCalculator(String),

    #[error("duplicate parameter id {0}")]
    DuplicateId(String),

    /// Range spec or fixed input names an unknown parameter
    #[error("unknown parameter {0}")]
    UnknownParameter(String),

    /// Ranges are only valid on numeric parameters
    #[error("parameter {0} is not numeric and cannot be ranged")]
    NotRangeable(String),

    /// Formula parameters are produced by the calculator, never supplied
    #[error("parameter {0} is calculated and cannot be supplied as an input")]
    NotAnInput(String),

    /// Value does not match the parameter kind
    #[error("value for {id} has the wrong type: expected {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    /// Input parameter with neither a fixed value nor a range
    #[error("input parameter {0} has no value")]
    MissingInput(String),

    #[error("invalid range for {id}: {reason}")]
    InvalidRange { id: String, reason: String },
}

/// Per-scenario arithmetic failures; the scenario is rejected and counted
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("division by zero while calculating {field}")]
    DivisionByZero { field: &'static str },

    #[error("non-finite result for {field}")]
    NonFinite { field: &'static str },

    #[error("equity cash flows have no internal rate of return")]
    IrrNotFound,

    /// Scenario lacks a numeric value the formula needs
    #[error("missing numeric input {0}")]
    MissingInput(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
