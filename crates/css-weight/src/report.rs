//! Report Assembler
//!
//! Combines the flattener with the selector and at-rule scorers into
//! serializable records.

use serde::Serialize;

use crate::at_rule::{at_rule_weight, get_at_rule_type, get_condition_text};
use crate::flatten::{enclosing_at_rules, flatten_leaf_rules, unique_selectors};
use crate::rule_tree::{GroupingRule, NodeId, RuleTree};
use crate::selector::{CombinatorCounts, FunctionalPseudoCounts, Selector};
use crate::specificity::{LightningSpecificity, Specificity, SpecificityCalculator};
use crate::Result;

/// A leaf style rule with its complexity score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedRule {
    /// Node the score was computed for
    #[serde(skip)]
    pub node: NodeId,
    /// Selector text as it appears in the tree, not sanitized
    pub selector_text: String,
    pub selector_complexity: usize,
}

/// A grouping at-rule with its condition weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRuleReport {
    pub at_rule_type: String,
    pub condition_text: String,
    pub at_rule_weight: usize,
}

impl AtRuleReport {
    pub fn from_grouping(rule: &GroupingRule) -> Result<Self> {
        let prelude = rule.prelude();
        Ok(Self {
            at_rule_type: get_at_rule_type(&prelude)?.unwrap_or_default(),
            condition_text: get_condition_text(&prelude)?.unwrap_or_default(),
            at_rule_weight: at_rule_weight(&prelude),
        })
    }
}

/// Every component of one selector's score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorReport {
    pub selector_text: String,
    pub specificity: Specificity,
    pub specificity_weight: usize,
    pub combinators: CombinatorCounts,
    pub combinator_weight: usize,
    pub functional_pseudos: FunctionalPseudoCounts,
    pub functional_pseudo_weight: usize,
    pub selector_complexity: usize,
}

impl SelectorReport {
    pub fn from_selector(selector: &Selector<'_>) -> Result<Self> {
        let specificity = selector.specificity()?;
        let specificity_weight = specificity.weight();
        let combinator_weight = selector.combinator_weight();
        let functional_pseudo_weight = selector.functional_pseudo_weight();

        Ok(Self {
            selector_text: selector.text().to_string(),
            specificity,
            specificity_weight,
            combinators: selector.combinators(),
            combinator_weight,
            functional_pseudos: selector.functional_pseudos(),
            functional_pseudo_weight,
            selector_complexity: specificity_weight + combinator_weight + functional_pseudo_weight,
        })
    }
}

/// Full report for one stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityReport {
    /// Distinct leaf selectors
    pub selectors: Vec<String>,
    pub weighted_rules: Vec<WeightedRule>,
    pub at_rules: Vec<AtRuleReport>,
    /// Per-selector score breakdown, filled by [`Self::with_breakdown`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<SelectorReport>,
}

impl ComplexityReport {
    pub fn from_tree(tree: Option<&RuleTree>) -> Result<Self> {
        Self::from_tree_with(tree, &LightningSpecificity)
    }

    pub fn from_tree_with(tree: Option<&RuleTree>, calculator: &dyn SpecificityCalculator) -> Result<Self> {
        let report = Self {
            selectors: unique_selectors(tree)?.into_iter().map(str::to_string).collect(),
            weighted_rules: weighted_rules_with(tree, calculator)?,
            at_rules: at_rule_inventory(tree)?,
            breakdown: Vec::new(),
        };

        tracing::debug!(
            "Assembled report: {} selectors, {} weighted rules, {} at-rules",
            report.selectors.len(),
            report.weighted_rules.len(),
            report.at_rules.len()
        );
        Ok(report)
    }

    /// Add a [`SelectorReport`] for every distinct selector
    pub fn with_breakdown(mut self, tree: Option<&RuleTree>) -> Result<Self> {
        self.breakdown = selector_reports(tree)?;
        Ok(self)
    }
}

/// Leaf rules in depth-first order, each with its selector complexity
pub fn weighted_rules(tree: Option<&RuleTree>) -> Result<Vec<WeightedRule>> {
    weighted_rules_with(tree, &LightningSpecificity)
}

pub fn weighted_rules_with(
    tree: Option<&RuleTree>,
    calculator: &dyn SpecificityCalculator,
) -> Result<Vec<WeightedRule>> {
    flatten_leaf_rules(tree)?
        .into_iter()
        .filter_map(|node| Some((node.id, node.selector_text()?)))
        .map(|(node, selector_text)| {
            let selector = Selector::with_calculator(selector_text, calculator);
            Ok(WeightedRule {
                node,
                selector_text: selector_text.to_string(),
                selector_complexity: selector.selector_complexity()?,
            })
        })
        .collect()
}

/// Score breakdown of each distinct leaf selector
pub fn selector_reports(tree: Option<&RuleTree>) -> Result<Vec<SelectorReport>> {
    unique_selectors(tree)?
        .into_iter()
        .map(|text| SelectorReport::from_selector(&Selector::new(text)))
        .collect()
}

/// One entry per grouping rule that directly encloses a leaf rule
pub fn at_rule_inventory(tree: Option<&RuleTree>) -> Result<Vec<AtRuleReport>> {
    enclosing_at_rules(tree)?
        .into_iter()
        .filter_map(|node| node.grouping())
        .map(AtRuleReport::from_grouping)
        .collect()
}
