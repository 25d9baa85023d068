//! Double-displacement (ion exchange) reaction generator.
//!
//! Every unordered pair of cation/anion combinations is tried as
//! `C1A1 + C2A2 = C1A2 + C2A1`. A pairing is kept only when it has a driving
//! force (water, a gas or a precipitate) and the reactants can actually meet
//! in solution.

use super::Reaction;
use crate::error::{InferError, Result};

/// Cations and their charges.
const CATIONS: &[(&str, u32)] = &[
    ("H", 1),
    ("NH4", 1),
    ("K", 1),
    ("Na", 1),
    ("Ag", 1),
    ("Ba", 2),
    ("Ca", 2),
    ("Mg", 2),
    ("Cu", 2),
    ("Al", 3),
    ("Fe", 3),
];

/// Anions and their charges. `O` stands for the oxide.
const ANIONS: &[(&str, u32)] = &[
    ("OH", 1),
    ("NO3", 1),
    ("Cl", 1),
    ("SO4", 2),
    ("CO3", 2),
    ("O", 2),
];

/// Cations forming an insoluble compound with the anion.
const INSOLUBLE: &[(&str, &[&str])] = &[
    ("OH", &["Mg", "Al", "Fe", "Cu"]),
    ("Cl", &["Ag"]),
    ("SO4", &["Ba"]),
    ("CO3", &["Ba", "Ca", "Fe", "Cu", "Ag"]),
];

/// Cations that do not form a usable compound with the anion.
const INVALID: &[(&str, &[&str])] = &[
    ("OH", &["Ag"]),
    ("CO3", &["Al"]),
    ("O", &["NH4", "K", "Na", "Ag", "Ba", "Mg"]),
];

const GASES: &[&str] = &["CO2", "NH3"];
const WATER: &str = "H2O";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ion {
    symbol: &'static str,
    charge: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pairing {
    cation: Ion,
    anion: Ion,
}

fn listed(table: &[(&str, &[&str])], cation: Ion, anion: Ion) -> bool {
    table
        .iter()
        .any(|(a, cations)| *a == anion.symbol && cations.contains(&cation.symbol))
}

impl Pairing {
    fn is_invalid(self) -> bool {
        listed(INVALID, self.cation, self.anion)
    }

    /// Acids and bases are not salts.
    fn is_salt(self) -> bool {
        self.anion.symbol != "OH" && self.cation.symbol != "H"
    }

    fn invalid_error(self) -> InferError {
        InferError::InvalidIonCombination {
            cation: self.cation.symbol.to_string(),
            anion: self.anion.symbol.to_string(),
        }
    }

    fn is_soluble(self) -> Result<bool> {
        if self.is_invalid() {
            return Err(self.invalid_error());
        }
        if self.anion.symbol == "O" {
            return Ok(false);
        }
        Ok(!listed(INSOLUBLE, self.cation, self.anion))
    }

    /// Charge-balanced formula, e.g. `Al2(SO4)3`.
    fn formula(self) -> Result<String> {
        if self.is_invalid() {
            return Err(self.invalid_error());
        }
        let g = gcd(self.cation.charge, self.anion.charge);
        Ok(format!(
            "{}{}",
            with_count(self.cation.symbol, self.anion.charge / g),
            with_count(self.anion.symbol, self.cation.charge / g)
        ))
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Append a multiplier. Single-element ions take a bare digit, polyatomic ones
/// are parenthesised.
fn with_count(ion: &str, count: u32) -> String {
    if count == 1 {
        return ion.to_string();
    }
    let uppercase = ion.chars().filter(|c| c.is_ascii_uppercase()).count();
    if uppercase == 1 {
        format!("{ion}{count}")
    } else {
        format!("({ion}){count}")
    }
}

/// Decomposition products of species that do not survive in solution.
fn decomposition(formula: &str) -> Option<&'static [&'static str]> {
    match formula {
        "H2CO3" => Some(&["H2O", "CO2"]),
        "NH4OH" => Some(&["NH3", "H2O"]),
        "H2O" | "HOH" => Some(&["H2O"]),
        _ => None,
    }
}

fn products_of(pairing: Pairing) -> Result<Vec<String>> {
    let formula = pairing.formula()?;
    Ok(match decomposition(&formula) {
        Some(parts) => parts.iter().map(|p| p.to_string()).collect(),
        None => vec![formula],
    })
}

/// Decide whether `first + second` exchange ions, returning the reaction.
fn exchange(first: Pairing, second: Pairing) -> Result<Option<Reaction>> {
    let (c1, a1) = (first.cation, first.anion);
    let (c2, a2) = (second.cation, second.anion);

    if a1 == a2 || c1 == c2 {
        return Ok(None);
    }
    let swapped_first = Pairing { cation: c1, anion: a2 };
    let swapped_second = Pairing { cation: c2, anion: a1 };
    if first.is_invalid() || second.is_invalid() {
        return Ok(None);
    }
    if swapped_first.is_invalid() || swapped_second.is_invalid() {
        return Ok(None);
    }

    let left = [first.formula()?, second.formula()?];
    if left.iter().any(|f| decomposition(f).is_some()) {
        return Ok(None);
    }
    if !first.is_soluble()? && !second.is_soluble()? {
        return Ok(None);
    }
    if (first.is_salt() && a2.symbol == "O") || (second.is_salt() && a1.symbol == "O") {
        return Ok(None);
    }

    let mut right = products_of(swapped_first)?;
    right.extend(products_of(swapped_second)?);

    let mut driven = right
        .iter()
        .any(|f| f == WATER || GASES.contains(&f.as_str()));
    if !swapped_first.is_soluble()? || !swapped_second.is_soluble()? {
        driven = true;
    }
    // Without an acid, a solid reactant cannot react.
    if c1.symbol != "H" && c2.symbol != "H" && (!first.is_soluble()? || !second.is_soluble()?) {
        driven = false;
    }

    Ok(driven.then(|| Reaction::new(left, right)))
}

fn all_pairings() -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(ANIONS.len() * CATIONS.len());
    for &(anion, anion_charge) in ANIONS {
        for &(cation, cation_charge) in CATIONS {
            pairings.push(Pairing {
                cation: Ion {
                    symbol: cation,
                    charge: cation_charge,
                },
                anion: Ion {
                    symbol: anion,
                    charge: anion_charge,
                },
            });
        }
    }
    pairings
}

/// Generate every spontaneous double-displacement reaction of the ion tables.
pub fn double_displacement() -> Result<Vec<Reaction>> {
    let pairings = all_pairings();
    let mut reactions = Vec::new();

    for (i, &first) in pairings.iter().enumerate() {
        for &second in &pairings[i + 1..] {
            if let Some(reaction) = exchange(first, second)? {
                reactions.push(reaction);
            }
        }
    }

    tracing::debug!(count = reactions.len(), "generated double-displacement reactions");
    Ok(reactions)
}
