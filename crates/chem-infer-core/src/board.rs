//! Per-puzzle relation graph over unknown letters.
//!
//! Each letter mirrors the knowledge-base relation shape, but its edges point
//! at other letters. It also carries its current candidate formulas and the
//! reaction equations it takes part in.

use crate::condition::{ChainOp, Condition, Letter};
use crate::error::MalformedCondition;
use crate::formula::{self, Elements};
use crate::knowledge::{KnowledgeBase, Relation};
use crate::set::FormulaSet;
use std::collections::BTreeSet;

/// Arena index of a letter node.
pub type NodeId = usize;

/// Equation-level constraint: sorted left letters react to (a subset of)
/// the products named by the sorted right letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransformConstraint {
    pub left: Vec<NodeId>,
    pub right: Vec<NodeId>,
}

/// One unknown letter.
#[derive(Debug, Clone)]
pub struct UnknownNode {
    pub letter: Letter,
    pub produces: BTreeSet<NodeId>,
    pub produced_from: BTreeSet<NodeId>,
    pub mutual: BTreeSet<NodeId>,
    pub co_reacts: BTreeSet<NodeId>,
    /// Formulas this letter may still resolve to. Only ever shrinks.
    pub possible: FormulaSet,
    pub transforms: BTreeSet<TransformConstraint>,
}

impl UnknownNode {
    pub fn edges(&self, relation: Relation) -> &BTreeSet<NodeId> {
        match relation {
            Relation::Produces => &self.produces,
            Relation::ProducedFrom => &self.produced_from,
            Relation::Mutual => &self.mutual,
            Relation::CoReacts => &self.co_reacts,
        }
    }
}

/// Relation graph of one puzzle, built against a shared knowledge base.
#[derive(Debug, Clone)]
pub struct PuzzleGraph<'kb> {
    kb: &'kb KnowledgeBase,
    nodes: Vec<UnknownNode>,
    by_letter: [Option<NodeId>; 26],
    misses: usize,
}

impl<'kb> PuzzleGraph<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self {
            kb,
            nodes: Vec::new(),
            by_letter: [None; 26],
            misses: 0,
        }
    }

    pub fn knowledge(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    /// Parse and apply one condition line. A malformed line leaves the graph
    /// untouched and is counted as a miss.
    pub fn input(&mut self, line: &str) -> Result<(), MalformedCondition> {
        match Condition::parse(line) {
            Ok(condition) => {
                self.apply(&condition);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(line = %e.line, reason = e.reason, "condition not understood");
                self.misses += 1;
                Err(e)
            }
        }
    }

    /// Apply every non-blank line of `text`, returning how many failed to parse.
    pub fn input_all(&mut self, text: &str) -> usize {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .filter(|line| self.input(line).is_err())
            .count()
    }

    /// Number of lines rejected by [`PuzzleGraph::input`] so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn apply(&mut self, condition: &Condition) {
        match condition {
            Condition::Chain(links) => {
                for &(a, op, b) in links {
                    match op {
                        ChainOp::Produces => self.relate_produces(a, b),
                        ChainOp::ProducedBy => self.relate_produces(b, a),
                        ChainOp::CoReacts => self.relate_co_reacts(a, b),
                        ChainOp::Mutual => self.relate_mutual(a, b),
                    }
                }
            }
            Condition::Equation { left, right } => self.add_equation(left, right),
            Condition::Identity { letter, formulas } => self.restrict_identity(*letter, formulas),
            Condition::ElementSet { letters, elements } => {
                for &l in letters {
                    self.restrict_exact_elements(l, elements);
                }
            }
            Condition::ElementCount { letters, count } => {
                for &l in letters {
                    self.restrict_element_count(l, *count, *count);
                }
            }
            Condition::ElementRange { letters, min, max } => {
                for &l in letters {
                    self.restrict_element_count(l, *min, *max);
                }
            }
            Condition::Oxide { letters } => {
                for &l in letters {
                    self.restrict_oxide(l);
                }
            }
            Condition::ElementSubset { letters, elements } => {
                for &l in letters {
                    self.restrict_made_of(l, elements);
                }
            }
            Condition::ElementMembership { letters, elements } => {
                for &l in letters {
                    self.restrict_contains_any(l, elements);
                }
            }
            Condition::Declare(l) => {
                self.declare(*l);
            }
        }
    }

    // ==================== Nodes ====================

    /// Node of `letter`, created with every known formula as candidate.
    pub fn declare(&mut self, letter: Letter) -> NodeId {
        if let Some(id) = self.by_letter[letter.index()] {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(UnknownNode {
            letter,
            produces: BTreeSet::new(),
            produced_from: BTreeSet::new(),
            mutual: BTreeSet::new(),
            co_reacts: BTreeSet::new(),
            possible: self.kb.all(),
            transforms: BTreeSet::new(),
        });
        self.by_letter[letter.index()] = Some(id);
        id
    }

    pub fn node_id(&self, letter: Letter) -> Option<NodeId> {
        self.by_letter[letter.index()]
    }

    pub fn node(&self, id: NodeId) -> &UnknownNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut UnknownNode {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[UnknownNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Letters in declaration order.
    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.nodes.iter().map(|n| n.letter)
    }

    /// Current candidate formulas of `letter`, if declared.
    pub fn candidates(&self, letter: Letter) -> Option<Vec<&'kb str>> {
        let kb = self.kb;
        self.node_id(letter)
            .map(|id| self.nodes[id].possible.iter().map(|f| kb.formula(f)).collect())
    }

    // ==================== Edges ====================

    /// `a` produces `b`. Self-relations only declare the letter.
    pub fn relate_produces(&mut self, a: Letter, b: Letter) {
        let a = self.declare(a);
        let b = self.declare(b);
        if a == b {
            return;
        }
        self.nodes[a].produces.insert(b);
        self.nodes[b].produced_from.insert(a);
        if self.nodes[a].produced_from.contains(&b) {
            self.nodes[a].mutual.insert(b);
            self.nodes[b].mutual.insert(a);
        }
    }

    /// `a` and `b` react together.
    pub fn relate_co_reacts(&mut self, a: Letter, b: Letter) {
        let a = self.declare(a);
        let b = self.declare(b);
        if a == b {
            return;
        }
        self.nodes[a].co_reacts.insert(b);
        self.nodes[b].co_reacts.insert(a);
    }

    /// `a` and `b` convert into each other.
    pub fn relate_mutual(&mut self, a: Letter, b: Letter) {
        self.relate_produces(a, b);
        self.relate_produces(b, a);
    }

    /// `left1+left2+...=right1+right2+...`: pairwise edges plus an
    /// equation-level constraint registered on every letter involved.
    pub fn add_equation(&mut self, left: &[Letter], right: &[Letter]) {
        for &a in left {
            for &b in left {
                if a != b {
                    self.relate_co_reacts(a, b);
                }
            }
        }
        for &l in left {
            for &r in right {
                self.relate_produces(l, r);
            }
        }

        let mut left_ids: Vec<NodeId> = left.iter().map(|&l| self.declare(l)).collect();
        let mut right_ids: Vec<NodeId> = right.iter().map(|&r| self.declare(r)).collect();
        left_ids.sort_unstable();
        right_ids.sort_unstable();
        let constraint = TransformConstraint {
            left: left_ids,
            right: right_ids,
        };

        let involved: BTreeSet<NodeId> = constraint
            .left
            .iter()
            .chain(&constraint.right)
            .copied()
            .collect();
        for id in involved {
            self.nodes[id].transforms.insert(constraint.clone());
        }
    }

    // ==================== Restrictions ====================

    fn restrict(&mut self, letter: Letter, keep: impl Fn(&Elements) -> bool) {
        let id = self.declare(letter);
        let kb = self.kb;
        self.nodes[id].possible.retain(|f| keep(kb.elements(f)));
    }

    /// Exactly this element set.
    pub fn restrict_exact_elements(&mut self, letter: Letter, elements: &Elements) {
        self.restrict(letter, |e| e == elements);
    }

    /// At least one element in common with `elements`.
    pub fn restrict_contains_any(&mut self, letter: Letter, elements: &Elements) {
        self.restrict(letter, |e| !e.is_disjoint(elements));
    }

    /// Composed only of elements from `elements`.
    pub fn restrict_made_of(&mut self, letter: Letter, elements: &Elements) {
        self.restrict(letter, |e| e.is_subset(elements));
    }

    /// Between `min` and `max` distinct elements, inclusive.
    pub fn restrict_element_count(&mut self, letter: Letter, min: usize, max: usize) {
        self.restrict(letter, |e| (min..=max).contains(&e.len()));
    }

    /// Two elements, one of them oxygen.
    pub fn restrict_oxide(&mut self, letter: Letter) {
        self.restrict(letter, formula::is_oxide_composition);
    }

    /// One of the named formulas. Names unknown to the knowledge base match
    /// nothing.
    pub fn restrict_identity(&mut self, letter: Letter, formulas: &[String]) {
        let id = self.declare(letter);
        let mut allowed = FormulaSet::empty(self.kb.len());
        for f in formulas {
            match self.kb.id(f) {
                Some(fid) => {
                    allowed.insert(fid);
                }
                None => tracing::warn!(%letter, formula = %f, "formula not in knowledge base"),
            }
        }
        self.nodes[id].possible.intersect_with(&allowed);
    }
}
