//! Puzzle condition grammar.
//!
//! One condition per line, letters case-insensitive:
//!
//! | Form | Meaning |
//! |---|---|
//! | `a>b<c-d=e` | chain of produces / produced-by / co-reacts / mutually-converts edges |
//! | `a+b=c+d` | reaction equation among letters |
//! | `a:CO2`, `a:[CO2,CO]` | explicit identity |
//! | `[abc](2)`, `[abc](2-3)` | distinct element count, exact or inclusive range |
//! | `[abc](O)` | oxide |
//! | `[abc]{HCO}` | composed only of these elements |
//! | `[abc][CuFe]` | contains at least one of these elements |
//! | `a` | declares the letter |

use crate::error::MalformedCondition;
use crate::formula::{self, Elements};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An unknown placeholder `A`..`Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct Letter(u8);

impl Letter {
    /// Case-insensitive conversion from an ASCII letter.
    pub fn from_char(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Letter(c.to_ascii_uppercase() as u8 - b'A'))
    }

    pub fn as_char(self) -> char {
        (b'A' + self.0) as char
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        letter.as_char()
    }
}

impl TryFrom<char> for Letter {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::from_char(c).ok_or_else(|| format!("`{c}` is not a letter"))
    }
}

/// Edge operator inside a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOp {
    /// `>`: left produces right
    Produces,
    /// `<`: left is produced by right
    ProducedBy,
    /// `-`: left and right react together
    CoReacts,
    /// `=`: left and right convert into each other
    Mutual,
}

impl ChainOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(ChainOp::Produces),
            '<' => Some(ChainOp::ProducedBy),
            '-' => Some(ChainOp::CoReacts),
            '=' => Some(ChainOp::Mutual),
            _ => None,
        }
    }
}

/// One parsed puzzle condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Edges between consecutive letters.
    Chain(Vec<(Letter, ChainOp, Letter)>),
    /// `left1+left2=right1+right2`.
    Equation { left: Vec<Letter>, right: Vec<Letter> },
    /// The letter is one of these formulas.
    Identity { letter: Letter, formulas: Vec<String> },
    /// Exactly this element set. No text form; built programmatically.
    ElementSet { letters: Vec<Letter>, elements: Elements },
    /// Exactly `count` distinct elements.
    ElementCount { letters: Vec<Letter>, count: usize },
    /// Between `min` and `max` distinct elements, inclusive.
    ElementRange { letters: Vec<Letter>, min: usize, max: usize },
    /// Two elements, one of which is oxygen.
    Oxide { letters: Vec<Letter> },
    /// Every element drawn from this set.
    ElementSubset { letters: Vec<Letter>, elements: Elements },
    /// At least one element from this set.
    ElementMembership { letters: Vec<Letter>, elements: Elements },
    /// The letter exists, unrestricted.
    Declare(Letter),
}

impl Condition {
    /// Parse one line. Whitespace anywhere in the line is ignored.
    pub fn parse(line: &str) -> Result<Self, MalformedCondition> {
        let s: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let chars: Vec<char> = s.chars().collect();
        let fail = |reason| MalformedCondition::new(line, reason);

        match chars.as_slice() {
            [] => Err(fail("empty condition")),
            [c] => Letter::from_char(*c)
                .map(Condition::Declare)
                .ok_or_else(|| fail("not a letter")),
            ['[', ..] => parse_group(&s).ok_or_else(|| fail("bad letter group restriction")),
            [c, ':', ..] if c.is_ascii_alphabetic() => {
                parse_identity(&s).ok_or_else(|| fail("bad identity"))
            }
            _ => parse_chain(&chars)
                .or_else(|| parse_equation(&s))
                .ok_or_else(|| fail("not a chain or equation")),
        }
    }
}

impl FromStr for Condition {
    type Err = MalformedCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}

fn parse_chain(chars: &[char]) -> Option<Condition> {
    if chars.len() < 3 || chars.len() % 2 == 0 {
        return None;
    }
    let mut links = Vec::with_capacity(chars.len() / 2);
    for i in (1..chars.len()).step_by(2) {
        let a = Letter::from_char(chars[i - 1])?;
        let op = ChainOp::from_char(chars[i])?;
        let b = Letter::from_char(chars[i + 1])?;
        links.push((a, op, b));
    }
    Some(Condition::Chain(links))
}

fn parse_letter_sum(side: &str) -> Option<Vec<Letter>> {
    side.split('+')
        .map(|term| {
            let mut it = term.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => Letter::from_char(c),
                _ => None,
            }
        })
        .collect()
}

fn parse_equation(s: &str) -> Option<Condition> {
    let (left, right) = s.split_once('=')?;
    Some(Condition::Equation {
        left: parse_letter_sum(left)?,
        right: parse_letter_sum(right)?,
    })
}

fn is_formula(f: &str) -> bool {
    let mut it = f.chars();
    match it.next() {
        Some(c) if c.is_ascii_uppercase() || c == '(' => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '(' || c == ')')
}

fn parse_identity(s: &str) -> Option<Condition> {
    let letter = Letter::from_char(s.chars().next()?)?;
    let body = &s[2..];
    let formulas: Vec<String> = match body.strip_prefix('[') {
        Some(rest) => rest
            .strip_suffix(']')?
            .split(',')
            .map(str::to_string)
            .collect(),
        None => vec![body.to_string()],
    };
    formulas
        .iter()
        .all(|f| is_formula(f))
        .then_some(Condition::Identity { letter, formulas })
}

/// Element lists like `HCONa`: an uppercase letter followed by word characters.
fn parse_element_list(list: &str) -> Option<Elements> {
    let mut it = list.chars();
    match it.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return None,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then(|| formula::elements(list))
}

fn parse_count(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_group(s: &str) -> Option<Condition> {
    let close = s.find(']')?;
    let letters: Vec<Letter> = s[1..close]
        .chars()
        .map(Letter::from_char)
        .collect::<Option<_>>()?;
    if letters.is_empty() {
        return None;
    }
    let rest = &s[close + 1..];

    if let Some(list) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let elements = parse_element_list(list)?;
        return Some(Condition::ElementMembership { letters, elements });
    }
    if let Some(list) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        let elements = parse_element_list(list)?;
        return Some(Condition::ElementSubset { letters, elements });
    }
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    if inner == "O" {
        return Some(Condition::Oxide { letters });
    }
    match inner.split_once('-') {
        Some((lo, hi)) => {
            let (a, b) = (parse_count(lo)?, parse_count(hi)?);
            Some(Condition::ElementRange {
                letters,
                min: a.min(b),
                max: a.max(b),
            })
        }
        None => Some(Condition::ElementCount {
            letters,
            count: parse_count(inner)?,
        }),
    }
}
