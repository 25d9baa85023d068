//! Fixed-width bitset over the formulas of one knowledge base.

use crate::knowledge::FormulaId;

/// Set of formula ids, one bit per formula in the knowledge base.
///
/// All sets built from the same knowledge base share the same universe size,
/// so union and intersection are word-wise operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormulaSet {
    words: Vec<u64>,
    universe: usize,
}

impl FormulaSet {
    /// Empty set over `universe` formulas.
    pub fn empty(universe: usize) -> Self {
        Self {
            words: vec![0; universe.div_ceil(64)],
            universe,
        }
    }

    /// Set containing every formula of the universe.
    pub fn full(universe: usize) -> Self {
        let mut set = Self::empty(universe);
        for (i, word) in set.words.iter_mut().enumerate() {
            let remaining = universe - i * 64;
            *word = if remaining >= 64 {
                u64::MAX
            } else {
                (1u64 << remaining) - 1
            };
        }
        set
    }

    pub fn universe(&self) -> usize {
        self.universe
    }

    #[inline]
    pub fn contains(&self, id: FormulaId) -> bool {
        let i = id.index();
        i < self.universe && self.words[i / 64] & (1 << (i % 64)) != 0
    }

    /// Insert `id`, returning true if it was not present.
    #[inline]
    pub fn insert(&mut self, id: FormulaId) -> bool {
        let i = id.index();
        debug_assert!(i < self.universe);
        let mask = 1 << (i % 64);
        let fresh = self.words[i / 64] & mask == 0;
        self.words[i / 64] |= mask;
        fresh
    }

    /// Remove `id`, returning true if it was present.
    #[inline]
    pub fn remove(&mut self, id: FormulaId) -> bool {
        let i = id.index();
        if i >= self.universe {
            return false;
        }
        let mask = 1 << (i % 64);
        let present = self.words[i / 64] & mask != 0;
        self.words[i / 64] &= !mask;
        present
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Whether every formula of the universe is present.
    pub fn is_full(&self) -> bool {
        self.len() == self.universe
    }

    /// Add every member of `other`.
    pub fn union_with(&mut self, other: &FormulaSet) {
        debug_assert_eq!(self.universe, other.universe);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// Keep only members also in `other`. Returns true if anything was removed.
    pub fn intersect_with(&mut self, other: &FormulaSet) -> bool {
        debug_assert_eq!(self.universe, other.universe);
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            let next = *a & *b;
            changed |= next != *a;
            *a = next;
        }
        changed
    }

    /// Keep only members for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(FormulaId) -> bool) {
        let doomed: Vec<FormulaId> = self.iter().filter(|&id| !keep(id)).collect();
        for id in doomed {
            self.remove(id);
        }
    }

    /// Members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = FormulaId> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(FormulaId::new(wi * 64 + bit))
            })
        })
    }
}
