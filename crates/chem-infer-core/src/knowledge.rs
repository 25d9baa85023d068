//! Knowledge base: relation graph over every known formula.
//!
//! Built once from a reaction inventory and read-only afterwards. Each formula
//! gets four relation sets (produces, produced-from, mutually-convertible,
//! co-reacts) plus its element set. A transformation table records, for each
//! exact reactant combination, the product lists seen for it.

use crate::error::Result;
use crate::formula::{self, Elements};
use crate::inventory::{self, Reaction};
use crate::set::FormulaSet;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Dense index of a formula inside one knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormulaId(u32);

impl FormulaId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four relation kinds shared by the knowledge base and the puzzle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Reachable as a product when this one is a reactant.
    Produces,
    /// Inverse of `Produces`.
    ProducedFrom,
    /// Produces in both directions.
    Mutual,
    /// Appears as a co-reactant in the same reaction.
    CoReacts,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::Produces,
        Relation::ProducedFrom,
        Relation::CoReacts,
        Relation::Mutual,
    ];

    /// The relation seen from the other end of an edge.
    pub fn inverse(self) -> Relation {
        match self {
            Relation::Produces => Relation::ProducedFrom,
            Relation::ProducedFrom => Relation::Produces,
            Relation::Mutual => Relation::Mutual,
            Relation::CoReacts => Relation::CoReacts,
        }
    }
}

/// Relations of one formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub produces: FormulaSet,
    pub produced_from: FormulaSet,
    pub mutual: FormulaSet,
    pub co_reacts: FormulaSet,
    pub elements: Elements,
}

impl Entry {
    fn new(universe: usize, formula: &str) -> Self {
        Self {
            produces: FormulaSet::empty(universe),
            produced_from: FormulaSet::empty(universe),
            mutual: FormulaSet::empty(universe),
            co_reacts: FormulaSet::empty(universe),
            elements: formula::elements(formula),
        }
    }

    pub fn relation(&self, relation: Relation) -> &FormulaSet {
        match relation {
            Relation::Produces => &self.produces,
            Relation::ProducedFrom => &self.produced_from,
            Relation::Mutual => &self.mutual,
            Relation::CoReacts => &self.co_reacts,
        }
    }
}

/// Relation graph over all formulas of a reaction inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    formulas: Vec<String>,
    ids: HashMap<String, FormulaId>,
    entries: Vec<Entry>,
    /// Sorted reactant ids -> distinct product lists.
    transforms: BTreeMap<Vec<FormulaId>, Vec<Vec<FormulaId>>>,
}

impl KnowledgeBase {
    /// Build from parsed reactions.
    pub fn build(reactions: &[Reaction]) -> Self {
        let mut kb = Self::default();
        kb.rebuild(reactions);
        kb
    }

    /// Parse reaction lines and build. Any malformed line is fatal.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let reactions = inventory::parse_lines(lines)?;
        Ok(Self::build(&reactions))
    }

    /// Knowledge base of the curated and generated inventory.
    pub fn standard() -> Result<Self> {
        Ok(Self::build(&inventory::standard()?))
    }

    /// Discard all state and rebuild from `reactions`.
    pub fn rebuild(&mut self, reactions: &[Reaction]) {
        self.formulas.clear();
        self.ids.clear();
        self.entries.clear();
        self.transforms.clear();

        // Interning first fixes the universe size of every set.
        for reaction in reactions {
            for formula in reaction.reactants.iter().chain(&reaction.products) {
                if !self.ids.contains_key(formula) {
                    let id = FormulaId::new(self.formulas.len());
                    self.ids.insert(formula.clone(), id);
                    self.formulas.push(formula.clone());
                }
            }
        }
        let universe = self.formulas.len();
        self.entries = self
            .formulas
            .iter()
            .map(|f| Entry::new(universe, f))
            .collect();

        for reaction in reactions {
            let left: Vec<FormulaId> = reaction.reactants.iter().map(|f| self.ids[f]).collect();
            let right: Vec<FormulaId> = reaction.products.iter().map(|f| self.ids[f]).collect();

            for &i in &left {
                for &j in &left {
                    if i != j {
                        self.entries[i.index()].co_reacts.insert(j);
                        self.entries[j.index()].co_reacts.insert(i);
                    }
                }
            }

            for &l in &left {
                for &r in &right {
                    self.entries[l.index()].produces.insert(r);
                    self.entries[r.index()].produced_from.insert(l);
                    if self.entries[r.index()].produces.contains(l) {
                        self.entries[l.index()].mutual.insert(r);
                        self.entries[r.index()].mutual.insert(l);
                    }
                }
            }

            let mut key = left;
            key.sort_unstable();
            let outcomes = self.transforms.entry(key).or_default();
            if !outcomes.contains(&right) {
                outcomes.push(right);
            }
        }

        tracing::debug!(
            reactions = reactions.len(),
            formulas = universe,
            reactant_sets = self.transforms.len(),
            "knowledge base built"
        );
    }

    /// Number of known formulas.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn id(&self, formula: &str) -> Option<FormulaId> {
        self.ids.get(formula).copied()
    }

    pub fn formula(&self, id: FormulaId) -> &str {
        &self.formulas[id.index()]
    }

    pub fn entry(&self, id: FormulaId) -> &Entry {
        &self.entries[id.index()]
    }

    pub fn elements(&self, id: FormulaId) -> &Elements {
        &self.entries[id.index()].elements
    }

    /// All formulas in id order.
    pub fn formulas(&self) -> impl Iterator<Item = (FormulaId, &str)> {
        self.formulas
            .iter()
            .enumerate()
            .map(|(i, f)| (FormulaId::new(i), f.as_str()))
    }

    /// Set of every known formula.
    pub fn all(&self) -> FormulaSet {
        FormulaSet::full(self.len())
    }

    /// Product lists recorded for exactly these reactants (order irrelevant).
    pub fn products_of(&self, reactants: &[FormulaId]) -> Option<&[Vec<FormulaId>]> {
        let mut key = reactants.to_vec();
        key.sort_unstable();
        self.transforms.get(&key).map(Vec::as_slice)
    }

    /// Whether `a` relates to `b` under `relation`.
    #[inline]
    pub fn related(&self, a: FormulaId, relation: Relation, b: FormulaId) -> bool {
        self.entries[a.index()].relation(relation).contains(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(lines: &[&str]) -> KnowledgeBase {
        KnowledgeBase::from_lines(lines.iter().copied()).unwrap()
    }

    fn names(kb: &KnowledgeBase, set: &FormulaSet) -> Vec<String> {
        let mut v: Vec<String> = set.iter().map(|id| kb.formula(id).to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_relations_from_single_reaction() {
        let kb = kb(&["C+O2=CO2"]);
        let c = kb.id("C").unwrap();
        let o2 = kb.id("O2").unwrap();
        let co2 = kb.id("CO2").unwrap();

        assert_eq!(kb.len(), 3);
        assert!(kb.related(c, Relation::Produces, co2));
        assert!(kb.related(co2, Relation::ProducedFrom, o2));
        assert!(kb.related(c, Relation::CoReacts, o2));
        assert!(kb.related(o2, Relation::CoReacts, c));
        assert!(!kb.related(co2, Relation::Produces, c));
        assert!(kb.entry(co2).mutual.is_empty());
    }

    #[test]
    fn test_mutual_conversion_is_symmetric() {
        let kb = kb(&["H2O+CO2=H2CO3", "H2CO3=H2O+CO2", "CaCO3=CaO+CO2"]);
        let h2co3 = kb.id("H2CO3").unwrap();
        let co2 = kb.id("CO2").unwrap();
        let cao = kb.id("CaO").unwrap();

        assert_eq!(names(&kb, &kb.entry(h2co3).mutual), vec!["CO2", "H2O"]);
        for (id, _) in kb.formulas() {
            for other in kb.entry(id).mutual.iter() {
                assert!(kb.related(other, Relation::Mutual, id));
            }
        }
        assert!(kb.related(co2, Relation::Mutual, h2co3));
        assert!(!kb.related(cao, Relation::Mutual, co2));
    }

    #[test]
    fn test_elements_recorded() {
        let kb = kb(&["Cu(OH)2=CuO+H2O"]);
        let id = kb.id("Cu(OH)2").unwrap();
        let elems: Vec<&str> = kb.elements(id).iter().map(String::as_str).collect();
        assert_eq!(elems, vec!["Cu", "H", "O"]);
    }

    #[test]
    fn test_transform_table_keeps_alternative_products() {
        let kb = kb(&["C+O2=CO2", "O2+C=CO", "C+O2=CO2"]);
        let c = kb.id("C").unwrap();
        let o2 = kb.id("O2").unwrap();
        let outcomes = kb.products_of(&[o2, c]).unwrap();
        let rendered: Vec<Vec<&str>> = outcomes
            .iter()
            .map(|o| o.iter().map(|&id| kb.formula(id)).collect())
            .collect();
        assert_eq!(rendered, vec![vec!["CO2"], vec!["CO"]]);
        assert!(kb.products_of(&[c]).is_none());
    }

    #[test]
    fn test_malformed_inventory_is_fatal() {
        assert!(KnowledgeBase::from_lines(["C+O2=CO2", "C+O2"]).is_err());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let reactions = inventory::standard().unwrap();
        let first = KnowledgeBase::build(&reactions);
        let mut second = first.clone();
        second.rebuild(&reactions);
        assert_eq!(first, second);

        // Rebuilding with a different inventory replaces everything
        second.rebuild(&inventory::parse_lines(["C+O2=CO2"]).unwrap());
        assert_eq!(second.len(), 3);
        assert!(second.id("NaCl").is_none());
    }

    #[test]
    fn test_standard_knowledge_base() {
        let kb = KnowledgeBase::standard().unwrap();
        let fe = kb.id("Fe").unwrap();
        let o2 = kb.id("O2").unwrap();
        let fe3o4 = kb.id("Fe3O4").unwrap();
        assert_eq!(kb.products_of(&[fe, o2]).unwrap(), &[vec![fe3o4]]);
        assert!(kb.id("NaSO4").is_none());
    }
}
