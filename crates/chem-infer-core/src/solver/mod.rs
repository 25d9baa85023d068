//! Solver orchestrator.
//!
//! Runs propagation over the puzzle graph, then enumerates every consistent
//! assignment with a depth-first search.

mod backtrack;
pub mod propagate;

use crate::board::PuzzleGraph;
use crate::condition::Letter;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use propagate::{propagate, PropagationStats};

/// One complete assignment of formulas to letters.
pub type Solution = BTreeMap<Letter, String>;

/// Configuration for the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Narrow candidates before searching
    pub propagate: bool,
    /// Work units propagation may spend before stopping early
    pub propagation_budget: u64,
    /// Neighbour checks the search may spend before giving up
    pub search_budget: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            propagate: true,
            propagation_budget: 800_000,
            search_budget: 60_000_000,
        }
    }
}

/// Diagnostic counters of one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    pub nodes_visited: u64,
    pub neighbor_checks: u64,
    pub propagation_work: u64,
    pub propagation_rounds: u64,
}

/// Every solution of a puzzle, plus how much work finding them took.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    pub solutions: Vec<Solution>,
    pub stats: SolveStats,
}

impl SolveReport {
    /// Check if the puzzle has exactly one solution
    pub fn is_unique(&self) -> bool {
        self.solutions.len() == 1
    }

    /// Letters whose formula is the same in every solution.
    pub fn settled(&self) -> BTreeMap<Letter, String> {
        let Some((first, rest)) = self.solutions.split_first() else {
            return BTreeMap::new();
        };
        first
            .iter()
            .filter(|(letter, formula)| rest.iter().all(|s| s.get(*letter) == Some(*formula)))
            .map(|(&letter, formula)| (letter, formula.clone()))
            .collect()
    }
}

/// Chemistry puzzle solver. Holds only configuration; all state is per call.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a new solver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find every solution of `graph`.
    ///
    /// Propagation narrows the graph's candidate sets in place. Exceeding the
    /// search budget is an error; no partial result is returned.
    pub fn solve(&self, graph: &mut PuzzleGraph<'_>) -> Result<SolveReport> {
        let propagation = if self.config.propagate {
            propagate(graph, self.config.propagation_budget)
        } else {
            PropagationStats::default()
        };

        let outcome = backtrack::search(graph, self.config.search_budget)?;
        let kb = graph.knowledge();
        let letters: Vec<Letter> = graph.letters().collect();
        let solutions = outcome
            .solutions
            .iter()
            .map(|assignment| {
                letters
                    .iter()
                    .zip(assignment)
                    .map(|(&letter, &f)| (letter, kb.formula(f).to_string()))
                    .collect()
            })
            .collect();

        Ok(SolveReport {
            solutions,
            stats: SolveStats {
                nodes_visited: outcome.nodes_visited,
                neighbor_checks: outcome.neighbor_checks,
                propagation_work: propagation.work,
                propagation_rounds: propagation.rounds,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferError;
    use crate::knowledge::KnowledgeBase;

    fn l(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_lines([
            "Fe+O2=Fe3O4",
            "C+O2=CO2",
            "C+O2=CO",
            "CO+O2=CO2",
            "CO+Fe3O4=Fe+CO2",
            "H2+O2=H2O",
        ])
        .unwrap()
    }

    fn solve(kb: &KnowledgeBase, puzzle: &str, config: SolverConfig) -> SolveReport {
        let mut g = PuzzleGraph::new(kb);
        assert_eq!(g.input_all(puzzle), 0);
        Solver::with_config(config).solve(&mut g).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert!(config.propagate);
        assert_eq!(config.propagation_budget, 800_000);
        assert_eq!(config.search_budget, 60_000_000);
        assert_eq!(Solver::new().config(), &config);
    }

    #[test]
    fn test_config_partial_json_fills_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"propagate": false}"#).unwrap();
        assert!(!config.propagate);
        assert_eq!(config.search_budget, 60_000_000);
    }

    #[test]
    fn test_unique_solution() {
        let kb = kb();
        let report = solve(&kb, "a+b=c\na:Fe\nb:O2", SolverConfig::default());
        assert!(report.is_unique());
        let s = &report.solutions[0];
        assert_eq!(s[&l('a')], "Fe");
        assert_eq!(s[&l('b')], "O2");
        assert_eq!(s[&l('c')], "Fe3O4");
        assert!(report.stats.nodes_visited >= 4);
        assert!(report.stats.propagation_rounds >= 1);
    }

    #[test]
    fn test_settled_letters() {
        let kb = kb();
        let report = solve(&kb, "a+b=c\na:C", SolverConfig::default());
        assert_eq!(report.solutions.len(), 2);
        assert!(!report.is_unique());
        let settled = report.settled();
        assert_eq!(settled.len(), 2);
        assert_eq!(settled[&l('a')], "C");
        assert_eq!(settled[&l('b')], "O2");
        assert!(SolveReport::default().settled().is_empty());
    }

    #[test]
    fn test_propagation_does_not_change_solutions() {
        let kb = kb();
        let puzzle = "a+b=c\nc+d=a+e\n[b](1)";
        let with = solve(&kb, puzzle, SolverConfig::default());
        let without = solve(
            &kb,
            puzzle,
            SolverConfig {
                propagate: false,
                ..SolverConfig::default()
            },
        );
        let mut a = with.solutions.clone();
        let mut b = without.solutions.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert_eq!(a.len(), 1);
        assert_eq!(without.stats.propagation_work, 0);
    }

    #[test]
    fn test_budget_is_fatal() {
        let kb = kb();
        let mut g = PuzzleGraph::new(&kb);
        g.input_all("a>b\nb>c");
        let solver = Solver::with_config(SolverConfig {
            propagate: false,
            search_budget: 1,
            ..SolverConfig::default()
        });
        assert_eq!(
            solver.solve(&mut g),
            Err(InferError::SearchBudgetExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_report_serializes_letters_as_keys() {
        let kb = kb();
        let report = solve(&kb, "a+b=c\na:Fe\nb:O2", SolverConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["solutions"][0]["C"], "Fe3O4");
        let back: SolveReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
