//! Error types for knowledge-base construction and search.

use thiserror::Error;

/// Fatal failures of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    /// A reaction string could not be split into reactants and products.
    #[error("malformed reaction `{reaction}`: {reason}")]
    MalformedReaction { reaction: String, reason: String },

    /// The ion tables asked for a species they also mark as impossible.
    #[error("invalid ion combination {cation} + {anion}")]
    InvalidIonCombination { cation: String, anion: String },

    /// The backtracking search probed more neighbours than allowed.
    #[error("search budget of {limit} checks exceeded")]
    SearchBudgetExceeded { limit: u64 },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InferError>;

/// A puzzle condition line that does not match the grammar.
///
/// Recoverable: the puzzle graph counts these and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised condition `{line}`: {reason}")]
pub struct MalformedCondition {
    pub line: String,
    pub reason: &'static str,
}

impl MalformedCondition {
    pub(crate) fn new(line: &str, reason: &'static str) -> Self {
        Self {
            line: line.to_string(),
            reason,
        }
    }
}
