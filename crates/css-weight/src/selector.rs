//! Selector Scorer
//!
//! Scores one selector from its specificity, its combinators and its
//! functional pseudo-classes. The combinator and pseudo-class scans work on
//! the raw text and are not grammar aware: a `+` inside an attribute value or
//! an `:is` inside a string is counted like any other.

use std::fmt;
use std::sync::OnceLock;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sanitize::sanitize_selector;
use crate::specificity::{LightningSpecificity, Specificity, SpecificityCalculator};
use crate::Result;

static DEFAULT_CALCULATOR: LightningSpecificity = LightningSpecificity;

/// Selector combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `~`
    GeneralSibling,
    /// `>`
    Child,
    /// `+`
    AdjacentSibling,
}

impl Combinator {
    pub const ALL: [Combinator; 3] = [Self::GeneralSibling, Self::Child, Self::AdjacentSibling];

    pub const fn symbol(self) -> char {
        match self {
            Self::GeneralSibling => '~',
            Self::Child => '>',
            Self::AdjacentSibling => '+',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Occurrences of each combinator; every combinator is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombinatorCounts([usize; 3]);

impl CombinatorCounts {
    /// Count combinator symbols character by character
    pub fn scan(text: &str) -> Self {
        let mut counts = Self::default();
        for combinator in text.chars().filter_map(Combinator::from_symbol) {
            counts.0[combinator.index()] += 1;
        }
        counts
    }

    pub fn get(&self, combinator: Combinator) -> usize {
        self.0[combinator.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Combinator, usize)> + '_ {
        Combinator::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Serialize for CombinatorCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Combinator::ALL.len()))?;
        for (combinator, count) in self.iter() {
            map.serialize_entry(&combinator.symbol().to_string(), &count)?;
        }
        map.end()
    }
}

/// Functional pseudo-class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalPseudo {
    Is,
    Where,
    Has,
    Not,
}

impl FunctionalPseudo {
    pub const ALL: [FunctionalPseudo; 4] = [Self::Is, Self::Where, Self::Has, Self::Not];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::Where => "where",
            Self::Has => "has",
            Self::Not => "not",
        }
    }

    /// Literal searched for in selector text
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Is => ":is",
            Self::Where => ":where",
            Self::Has => ":has",
            Self::Not => ":not",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Occurrences of each functional pseudo-class; all four are always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionalPseudoCounts([usize; 4]);

impl FunctionalPseudoCounts {
    /// Count `:is`, `:where`, `:has` and `:not` occurrences, ignoring case
    pub fn scan(text: &str) -> Self {
        let text = text.to_lowercase();
        let mut counts = Self::default();
        for pseudo in FunctionalPseudo::ALL {
            counts.0[pseudo.index()] = text.matches(pseudo.pattern()).count();
        }
        counts
    }

    pub fn get(&self, pseudo: FunctionalPseudo) -> usize {
        self.0[pseudo.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FunctionalPseudo, usize)> + '_ {
        FunctionalPseudo::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Serialize for FunctionalPseudoCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FunctionalPseudo::ALL.len()))?;
        for (pseudo, count) in self.iter() {
            map.serialize_entry(pseudo.name(), &count)?;
        }
        map.end()
    }
}

/// A sanitized selector with derived weights.
///
/// Specificity comes from an injected [`SpecificityCalculator`] and is
/// computed once, on first use.
#[derive(Clone)]
pub struct Selector<'c> {
    text: String,
    calculator: &'c dyn SpecificityCalculator,
    specificity: OnceLock<Specificity>,
}

impl Selector<'static> {
    /// Selector scored with the lightningcss calculator
    pub fn new(text: &str) -> Self {
        Self::with_calculator(text, &DEFAULT_CALCULATOR)
    }
}

impl<'c> Selector<'c> {
    pub fn with_calculator(text: &str, calculator: &'c dyn SpecificityCalculator) -> Self {
        Self {
            text: sanitize_selector(text),
            calculator,
            specificity: OnceLock::new(),
        }
    }

    /// Sanitized selector text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn specificity(&self) -> Result<Specificity> {
        if let Some(specificity) = self.specificity.get() {
            return Ok(*specificity);
        }

        let specificity = self.calculator.calculate(&self.text)?;
        Ok(*self.specificity.get_or_init(|| specificity))
    }

    pub fn specificity_weight(&self) -> Result<usize> {
        Ok(self.specificity()?.weight())
    }

    pub fn combinators(&self) -> CombinatorCounts {
        CombinatorCounts::scan(&self.text)
    }

    pub fn combinator_weight(&self) -> usize {
        self.combinators().total()
    }

    pub fn functional_pseudos(&self) -> FunctionalPseudoCounts {
        FunctionalPseudoCounts::scan(&self.text)
    }

    pub fn functional_pseudo_weight(&self) -> usize {
        self.functional_pseudos().total()
    }

    /// Specificity weight + combinator weight + functional pseudo weight
    pub fn selector_complexity(&self) -> Result<usize> {
        Ok(self.specificity_weight()? + self.combinator_weight() + self.functional_pseudo_weight())
    }
}

impl fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("text", &self.text)
            .field("specificity", &self.specificity.get())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Selector<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Selector<'_> {}
