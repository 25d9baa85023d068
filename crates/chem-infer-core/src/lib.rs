//! Reasoning engine for chemistry inference puzzles.
//!
//! A puzzle names unknown substances with letters and relates them:
//! `a>b` (a produces b), `a+b=c+d`, `[ab](O)` (both are oxides), and so on.
//! The engine compiles a reaction inventory into a [`KnowledgeBase`], builds a
//! [`PuzzleGraph`] from the puzzle's condition lines, and lets the [`Solver`]
//! enumerate every letter-to-formula assignment that satisfies them.
//!
//! ```
//! use chem_infer_core::{KnowledgeBase, PuzzleGraph, Solver};
//!
//! let kb = KnowledgeBase::standard().unwrap();
//! let mut graph = PuzzleGraph::new(&kb);
//! assert_eq!(graph.input_all("a+b=c\na:Fe\nb:O2"), 0);
//! let report = Solver::new().solve(&mut graph).unwrap();
//! assert!(report.is_unique());
//! ```

pub mod board;
pub mod condition;
pub mod error;
pub mod formula;
pub mod inventory;
pub mod knowledge;
pub mod set;
pub mod solver;

pub use board::PuzzleGraph;
pub use condition::{Condition, Letter};
pub use error::{InferError, MalformedCondition, Result};
pub use inventory::Reaction;
pub use knowledge::{FormulaId, KnowledgeBase, Relation};
pub use set::FormulaSet;
pub use solver::{PropagationStats, Solution, SolveReport, SolveStats, Solver, SolverConfig};
