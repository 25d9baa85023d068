//! Element extraction from chemical formula strings.
//!
//! A formula like `Ca(HCO3)2` is reduced to the set of element symbols it
//! mentions. Counts, parentheses and multipliers are ignored, and symbols are
//! not checked against a periodic table.

use std::collections::BTreeSet;

/// Set of element symbols contained in a formula.
pub type Elements = BTreeSet<String>;

/// Extract the element symbols of `formula`.
///
/// An uppercase letter starts a symbol; a directly following lowercase letter
/// is taken as its second character. Everything else is skipped, so the
/// function never fails.
pub fn elements(formula: &str) -> Elements {
    let chars: Vec<char> = formula.chars().collect();
    let mut result = Elements::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            continue;
        }
        match chars.get(i + 1) {
            Some(&next) if next.is_lowercase() => {
                let mut symbol = String::with_capacity(2);
                symbol.push(c);
                symbol.push(next);
                result.insert(symbol);
            }
            _ => {
                result.insert(c.to_string());
            }
        }
    }

    result
}

/// Exactly two elements, one of them oxygen.
pub fn is_oxide_composition(elems: &Elements) -> bool {
    elems.len() == 2 && elems.contains("O")
}

/// Whether `formula` is an oxide.
pub fn is_oxide(formula: &str) -> bool {
    is_oxide_composition(&elements(formula))
}
