//! Candidate narrowing ahead of the search.
//!
//! Two passes: a degree filter, then relational sweeps to a fixpoint. Both only
//! ever remove candidates that no complete assignment could use, so the
//! solution set is unaffected; they only shrink the search.

use crate::board::{NodeId, PuzzleGraph};
use crate::knowledge::Relation;
use crate::set::FormulaSet;
use serde::{Deserialize, Serialize};

/// Counters of one propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationStats {
    /// Full sweeps over the graph.
    pub rounds: u64,
    /// Formulas folded into neighbour unions.
    pub work: u64,
    /// The work budget ran out before a fixpoint was reached.
    pub exhausted: bool,
}

/// Narrow every letter's candidates in place.
pub fn propagate(graph: &mut PuzzleGraph<'_>, budget: u64) -> PropagationStats {
    degree_filter(graph);
    let stats = relational_fixpoint(graph, budget);
    tracing::debug!(
        rounds = stats.rounds,
        work = stats.work,
        exhausted = stats.exhausted,
        "propagation finished"
    );
    stats
}

/// Drop candidates with fewer relations of some kind than the letter has
/// edges of that kind. Letters take distinct formulas, so each edge needs its
/// own partner.
fn degree_filter(graph: &mut PuzzleGraph<'_>) {
    let kb = graph.knowledge();
    for id in 0..graph.len() {
        let degrees = Relation::ALL.map(|r| graph.node(id).edges(r).len());
        graph.node_mut(id).possible.retain(|f| {
            let entry = kb.entry(f);
            Relation::ALL
                .iter()
                .zip(degrees)
                .all(|(&r, degree)| entry.relation(r).len() >= degree)
        });
    }
}

/// Union of what the neighbour's candidates relate to under the inverse
/// relation, stopping early once it covers every formula.
fn reachable(
    graph: &PuzzleGraph<'_>,
    neighbour: NodeId,
    relation: Relation,
    work: &mut u64,
) -> FormulaSet {
    let kb = graph.knowledge();
    let mut union = FormulaSet::empty(kb.len());
    for guess in graph.node(neighbour).possible.iter() {
        let targets = kb.entry(guess).relation(relation.inverse());
        *work += targets.len() as u64;
        union.union_with(targets);
        if union.is_full() {
            break;
        }
    }
    union
}

fn relational_fixpoint(graph: &mut PuzzleGraph<'_>, budget: u64) -> PropagationStats {
    let mut stats = PropagationStats::default();

    loop {
        stats.rounds += 1;
        let mut dirty = false;

        for id in 0..graph.len() {
            for relation in Relation::ALL {
                let neighbours: Vec<NodeId> = graph.node(id).edges(relation).iter().copied().collect();
                for next in neighbours {
                    let union = reachable(graph, next, relation, &mut stats.work);
                    // A full union cannot narrow anything
                    if !union.is_full() && graph.node_mut(id).possible.intersect_with(&union) {
                        dirty = true;
                    }
                }
            }
        }

        if !dirty {
            break;
        }
        if stats.work > budget {
            stats.exhausted = true;
            break;
        }
    }

    stats
}
