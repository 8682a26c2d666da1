//! Selector Specificity
//!
//! The (id, class, type) triple and the calculator seam that produces it.
//! The default calculator lets lightningcss parse the selector and reads the
//! specificity the selector engine packs into a single integer.

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use serde::Serialize;

use crate::{CssWeightError, Result};

/// Selector specificity (id, class, type)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Specificity {
    /// ID selectors
    pub id: u32,
    /// Classes, attributes and pseudo-classes
    pub class: u32,
    /// Type selectors and pseudo-elements
    #[serde(rename = "type")]
    pub element: u32,
}

impl Specificity {
    const FIELD_BITS: u32 = 10;
    const FIELD_MASK: u32 = (1 << Self::FIELD_BITS) - 1;

    pub fn new(id: u32, class: u32, element: u32) -> Self {
        Self { id, class, element }
    }

    /// Decode the selector engine's packed form: `id << 20 | class << 10 | type`.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            id: (packed >> (2 * Self::FIELD_BITS)) & Self::FIELD_MASK,
            class: (packed >> Self::FIELD_BITS) & Self::FIELD_MASK,
            element: packed & Self::FIELD_MASK,
        }
    }

    /// Sum of the three components
    pub fn weight(&self) -> usize {
        (self.id + self.class + self.element) as usize
    }
}

/// Computes the raw specificity of one selector string
pub trait SpecificityCalculator: Send + Sync {
    fn calculate(&self, selector: &str) -> Result<Specificity>;
}

/// lightningcss-backed calculator.
///
/// For a selector list the highest specificity of the list is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningSpecificity;

impl SpecificityCalculator for LightningSpecificity {
    fn calculate(&self, selector: &str) -> Result<Specificity> {
        let source = format!("{selector} {{}}");

        let stylesheet = StyleSheet::parse(&source, ParserOptions::default()).map_err(|e| {
            CssWeightError::InvalidSelector {
                selector: selector.to_string(),
                message: e.to_string(),
            }
        })?;

        let specificity = stylesheet.rules.0.iter().find_map(|rule| match rule {
            CssRule::Style(style_rule) => style_rule
                .selectors
                .0
                .iter()
                .map(|sel| Specificity::from_packed(sel.specificity()))
                .max(),
            _ => None,
        });

        specificity.ok_or_else(|| CssWeightError::InvalidSelector {
            selector: selector.to_string(),
            message: "no style rule produced".to_string(),
        })
    }
}
