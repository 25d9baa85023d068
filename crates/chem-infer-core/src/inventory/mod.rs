//! Reaction inventory: the curated equation list plus generated
//! double-displacement reactions.

mod ions;

use crate::error::{InferError, Result};
use std::fmt;
use std::str::FromStr;

pub use ions::double_displacement;

/// A reaction equation `F1+F2+...=G1+G2+...`.
///
/// Coefficients are not modelled; repeated formulas are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reaction {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
}

impl Reaction {
    pub fn new<L, R, S>(reactants: L, products: R) -> Self
    where
        L: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reactants: reactants.into_iter().map(Into::into).collect(),
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromStr for Reaction {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let malformed = |reason: &str| InferError::MalformedReaction {
            reaction: s.to_string(),
            reason: reason.to_string(),
        };

        let mut sides = compact.split('=');
        let (left, right) = match (sides.next(), sides.next(), sides.next()) {
            (Some(l), Some(r), None) => (l, r),
            (_, None, _) => return Err(malformed("missing `=`")),
            _ => return Err(malformed("more than one `=`")),
        };

        let split_side = |side: &str| -> Result<Vec<String>> {
            side.split('+')
                .map(|f| {
                    if f.is_empty() {
                        Err(malformed("empty formula"))
                    } else {
                        Ok(f.to_string())
                    }
                })
                .collect()
        };

        Ok(Self {
            reactants: split_side(left)?,
            products: split_side(right)?,
        })
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.reactants.join("+"), self.products.join("+"))
    }
}

/// Parse reaction lines, skipping blank lines and `#` comments.
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<Reaction>> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(Reaction::from_str)
        .collect()
}

/// Hand-curated reactions of the middle-school syllabus.
pub const CURATED: &[&str] = &[
    // Combustion and chlorination
    "Mg+O2=MgO",
    "C+O2=CO2",
    "C+O2=CO",
    "Fe+O2=Fe3O4",
    "Fe+O2+H2O=Fe2O3",
    "Cu+O2=CuO",
    "Al+O2=Al2O3",
    "H2+O2=H2O",
    "H2+Cl2=HCl",
    "Na+Cl2=NaCl",
    "S+O2=SO2",
    "Hg+O2=HgO",
    "P+O2=P2O5",
    // Reduction of metal oxides
    "C+CuO=Cu+CO2",
    "C+Fe2O3=Fe+CO2",
    "C+Fe3O4=Fe+CO2",
    "CO+CuO=Cu+CO2",
    "CO+Fe2O3=Fe+CO2",
    "CO+Fe3O4=Fe+CO2",
    "H2+CuO=Cu+H2O",
    "H2+Fe2O3=Fe+H2O",
    "H2+Fe3O4=Fe+H2O",
    // Acid + metal
    "Zn+HCl=ZnCl2+H2",
    "Mg+HCl=MgCl2+H2",
    "Fe+HCl=FeCl2+H2",
    "Al+HCl=AlCl3+H2",
    "Zn+H2SO4=ZnSO4+H2",
    "Mg+H2SO4=MgSO4+H2",
    "Fe+H2SO4=FeSO4+H2",
    "Al+H2SO4=Al2(SO4)3+H2",
    // Metal displacement in solution
    "Mg+Al2(SO4)3=MgSO4+Al",
    "Mg+AlCl3=MgCl2+Al",
    "Mg+ZnSO4=MgSO4+Zn",
    "Mg+ZnCl2=MgCl2+Zn",
    "Mg+FeSO4=MgSO4+Fe",
    "Mg+FeCl2=MgCl2+Fe",
    "Mg+CuSO4=MgSO4+Cu",
    "Al+ZnSO4=Al2(SO4)3+Zn",
    "Al+Zn(NO3)2=Al(NO3)3+Zn",
    "Al+ZnCl2=AlCl3+Zn",
    "Al+FeSO4=Al2(SO4)3+Fe",
    "Al+Fe(NO3)2=Al(NO3)3+Fe",
    "Al+FeCl2=AlCl3+Fe",
    "Al+CuSO4=Al2(SO4)3+Cu",
    "Al+Cu(NO3)2=Al(NO3)3+Cu",
    "Al+AgNO3=Al(NO3)3+Ag",
    "Zn+FeSO4=ZnSO4+Fe",
    "Zn+Fe(NO3)2=Zn(NO3)2+Fe",
    "Zn+FeCl2=ZnCl2+Fe",
    "Zn+CuSO4=ZnSO4+Cu",
    "Zn+Cu(NO3)2=Zn(NO3)2+Cu",
    "Zn+AgNO3=Zn(NO3)2+Ag",
    "Fe+CuSO4=FeSO4+Cu",
    "Fe+Cu(NO3)2=Fe(NO3)2+Cu",
    "Fe+AgNO3=Fe(NO3)2+Ag",
    "Cu+AgNO3=Cu(NO3)2+Ag",
    // Decomposition and miscellaneous
    "H2O2=H2O+O2",
    "H2O=H2+O2",
    "HgO=Hg+O2",
    "KClO3=KCl+O2",
    "KMnO4=K2MnO4+MnO2+O2",
    "Cu(OH)2=CuO+H2O",
    "CO2+C=CO",
    "CO+O2=CO2",
    "CO2+H2O=C6H12O6+O2",
    "H2O+CO2=H2CO3",
    "H2CO3=H2O+CO2",
    "CaO+H2O=Ca(OH)2",
    "Ca(OH)2+CO2=CaCO3+H2O",
    "CaCO3=CaO+CO2",
    "CaCO3+HCl=CaCl2+H2O+CO2",
    "CH4+O2=CO2+H2O",
    "C2H5OH+O2=CO2+H2O",
    "C6H12O6+O2=CO2+H2O",
    // Acid + metal oxide
    "Fe2O3+HCl=FeCl3+H2O",
    "Fe2O3+H2SO4=Fe2(SO4)3+H2O",
    "CuO+HCl=CuCl2+H2O",
    "CuO+H2SO4=CuSO4+H2O",
    "CaO+HCl=CaCl2+H2O",
    "CaO+H2SO4=CaSO4+H2O",
    // Acid + base
    "HCl+NaOH=NaCl+H2O",
    "HCl+Ca(OH)2=CaCl2+H2O",
    "H2SO4+NaOH=Na2SO4+H2O",
    "H2SO4+Ca(OH)2=CaSO4+H2O",
    "HCl+Al(OH)3=AlCl3+H2O",
    "HCl+Mg(OH)2=MgCl2+H2O",
    "Cu(OH)2+HCl=CuCl2+H2O",
    "Fe(OH)3+HCl=FeCl3+H2O",
    // Acid + salt
    "Na2CO3+HCl=NaCl+H2O+CO2",
    "NaHCO3+HCl=NaCl+H2O+CO2",
    "CaCO3+H2SO4=CaSO4+H2O+CO2",
    "H2SO4+BaCl2=BaSO4+HCl",
    "HCl+AgNO3=AgCl+HNO3",
    // Base + salt
    "CuSO4+NaOH=Cu(OH)2+Na2SO4",
    "Ca(OH)2+CuSO4=Cu(OH)2+CaSO4",
    "NaOH+FeCl3=Fe(OH)3+NaCl",
    "NaOH+MgCl2=Mg(OH)2+NaCl",
    "Na2CO3+Ca(OH)2=NaOH+CaCO3",
    "CuSO4+Ba(OH)2=Cu(OH)2+BaSO4",
    "NH4Cl+NaOH=NaCl+NH3+H2O",
    "NH4NO3+Ca(OH)2=Ca(NO3)2+NH3+H2O",
    "(NH4)2SO4+NaOH=Na2SO4+NH3+H2O",
    // Base + non-metal oxide
    "NaOH+CO2=Na2CO3+H2O",
    "NaOH+SO2=Na2SO3+H2O",
    "NaOH+SO3=Na2SO4+H2O",
    "KOH+SO3=K2SO4+H2O",
    "Ba(OH)2+SO3=BaSO4+H2O",
    "Ca(OH)2+SO3=CaSO4+H2O",
    // Salt + salt
    "Na2CO3+CaCl2=NaCl+CaCO3",
    "Na2CO3+BaCl2=NaCl+BaCO3",
    "CuSO4+BaCl2=CuCl2+BaSO4",
    // Bicarbonates
    "Ca(HCO3)2=CaCO3+CO2+H2O",
    "NaHCO3=Na2CO3+CO2+H2O",
    "NH4HCO3=NH3+CO2+H2O",
    "CaCO3+CO2+H2O=Ca(HCO3)2",
    "Na2CO3+CO2+H2O=NaHCO3",
];

/// The curated reactions, parsed.
pub fn curated() -> Result<Vec<Reaction>> {
    parse_lines(CURATED.iter().copied())
}

/// Curated reactions followed by the generated double-displacement ones.
pub fn standard() -> Result<Vec<Reaction>> {
    let mut reactions = curated()?;
    reactions.extend(double_displacement()?);
    Ok(reactions)
}
