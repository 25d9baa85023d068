//! Depth-first search over the narrowed candidates.
//!
//! A single assignment vector and used-formula set are shared by every
//! branch; each assignment is undone before the branch returns.

use crate::board::{NodeId, PuzzleGraph, TransformConstraint};
use crate::error::{InferError, Result};
use crate::knowledge::{FormulaId, KnowledgeBase, Relation};
use crate::set::FormulaSet;

/// Relations checked between a guess and already assigned neighbours.
/// Mutual edges are implied by produces edges in both directions.
const CHECKED: [Relation; 3] = [Relation::Produces, Relation::ProducedFrom, Relation::CoReacts];

/// Result of an exhaustive search.
pub(crate) struct SearchOutcome {
    /// One formula per node, indexed by node id.
    pub solutions: Vec<Vec<FormulaId>>,
    pub nodes_visited: u64,
    pub neighbor_checks: u64,
}

struct Search<'g, 'kb> {
    graph: &'g PuzzleGraph<'kb>,
    kb: &'kb KnowledgeBase,
    order: Vec<NodeId>,
    assigned: Vec<Option<FormulaId>>,
    used: FormulaSet,
    budget: u64,
    nodes_visited: u64,
    neighbor_checks: u64,
    solutions: Vec<Vec<FormulaId>>,
}

/// Enumerate every consistent assignment, failing once more than `budget`
/// neighbour checks have been spent.
pub(crate) fn search(graph: &PuzzleGraph<'_>, budget: u64) -> Result<SearchOutcome> {
    // Fewest candidates first
    let mut order: Vec<NodeId> = (0..graph.len()).collect();
    order.sort_by_key(|&id| graph.node(id).possible.len());

    let kb = graph.knowledge();
    let mut search = Search {
        graph,
        kb,
        order,
        assigned: vec![None; graph.len()],
        used: FormulaSet::empty(kb.len()),
        budget,
        nodes_visited: 0,
        neighbor_checks: 0,
        solutions: Vec::new(),
    };
    search.visit(0)?;

    tracing::debug!(
        solutions = search.solutions.len(),
        nodes = search.nodes_visited,
        checks = search.neighbor_checks,
        "search finished"
    );
    Ok(SearchOutcome {
        solutions: search.solutions,
        nodes_visited: search.nodes_visited,
        neighbor_checks: search.neighbor_checks,
    })
}

impl<'g, 'kb> Search<'g, 'kb> {
    fn visit(&mut self, depth: usize) -> Result<()> {
        if self.neighbor_checks > self.budget {
            tracing::warn!(
                limit = self.budget,
                nodes = self.nodes_visited,
                "search budget exceeded"
            );
            return Err(InferError::SearchBudgetExceeded { limit: self.budget });
        }
        self.nodes_visited += 1;

        let Some(&id) = self.order.get(depth) else {
            self.solutions.push(self.assigned.iter().flatten().copied().collect());
            return Ok(());
        };

        let graph = self.graph;
        for guess in graph.node(id).possible.iter() {
            if self.used.contains(guess) || !self.fits_neighbours(id, guess) {
                continue;
            }
            self.assigned[id] = Some(guess);
            if self.transforms_hold(id) {
                self.used.insert(guess);
                self.visit(depth + 1)?;
                self.used.remove(guess);
            }
            self.assigned[id] = None;
        }
        Ok(())
    }

    /// Every assigned neighbour must be related to `guess` in the knowledge
    /// base the same way the letters are related in the puzzle.
    fn fits_neighbours(&mut self, id: NodeId, guess: FormulaId) -> bool {
        let node = self.graph.node(id);
        for relation in CHECKED {
            for &next in node.edges(relation) {
                self.neighbor_checks += 1;
                if let Some(formula) = self.assigned[next] {
                    if !self.kb.related(guess, relation, formula) {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn transforms_hold(&self, id: NodeId) -> bool {
        self.graph
            .node(id)
            .transforms
            .iter()
            .all(|t| self.transform_holds(t))
    }

    /// Checkable once the left side is fully assigned: the reactants must be a
    /// known combination and some recorded outcome must contain every
    /// assigned product letter.
    fn transform_holds(&self, constraint: &TransformConstraint) -> bool {
        let left: Option<Vec<FormulaId>> = constraint.left.iter().map(|&l| self.assigned[l]).collect();
        let Some(left) = left else {
            return true;
        };
        let Some(outcomes) = self.kb.products_of(&left) else {
            return false;
        };
        outcomes.iter().any(|products| {
            constraint
                .right
                .iter()
                .filter_map(|&r| self.assigned[r])
                .all(|f| products.contains(&f))
        })
    }
}
