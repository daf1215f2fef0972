//! Permutation pipeline: cross-product generation, evaluation and aggregation

pub mod combinations;
mod engine;
mod result;

pub use combinations::{Combination, CombinationGenerator};
pub use engine::{
    CancellationToken, PermutationEngine, RunOptions, DEFAULT_COMBINATION_CEILING, DEFAULT_MAX_PERMUTATIONS,
};
pub use result::{reduction_percent, ExclusionBreakdown, PermutationResult, RankingObjective, Summary};
