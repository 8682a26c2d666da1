//! css-weight: CSS Complexity Scoring
//!
//! Derives a complexity number for every style rule (from its selector) and
//! for every conditional at-rule (from its condition text), and assembles a
//! flat, de-duplicated inventory suitable for reporting.
//!
//! # Example
//! ```rust,ignore
//! use css_weight::{CssParser, ComplexityReport};
//!
//! let tree = CssParser::new().parse("@media screen { .a > b { color: red; } }")?;
//! let report = ComplexityReport::from_tree(Some(&tree))?;
//! assert_eq!(report.weighted_rules[0].selector_complexity, 3);
//! ```

mod config;
mod flatten;
mod output;
mod parser;
mod reader;
mod report;
mod rule_tree;
mod sanitize;
mod specificity;

pub mod at_rule;
pub mod selector;
pub mod vocabulary;

pub use at_rule::{
    at_rule_weight, get_at_rule_type, get_condition_text, tokenize_at_rule, tokenize_at_type,
    AtRule, AtRuleToken,
};
pub use config::{Config, ConfigRequest, DEFAULT_OUTPUT_FILE, LOG_FILE_NAME, USAGE};
pub use flatten::{enclosing_at_rules, flatten_leaf_rules, flatten_leaf_rules_under, unique_selectors};
pub use output::Outputter;
pub use parser::CssParser;
pub use reader::CssReader;
pub use report::{
    at_rule_inventory, selector_reports, weighted_rules, weighted_rules_with, AtRuleReport,
    ComplexityReport, SelectorReport, WeightedRule,
};
pub use rule_tree::{GroupingRule, NodeId, RuleKind, RuleNode, RuleTree, RuleTreeBuilder};
pub use sanitize::{sanitize_at_rule, sanitize_at_rule_bytes, sanitize_selector, sanitize_selector_bytes};
pub use selector::{Combinator, CombinatorCounts, FunctionalPseudo, FunctionalPseudoCounts, Selector};
pub use specificity::{LightningSpecificity, Specificity, SpecificityCalculator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CssWeightError>;

/// Errors raised while scoring or reading CSS
#[derive(Debug, thiserror::Error)]
pub enum CssWeightError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing rule tree")]
    MissingRuleTree,

    #[error("No at-rule type found in {text:?}")]
    AtRuleTypeNotFound { text: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("No data or filename provided")]
    MissingOutput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
