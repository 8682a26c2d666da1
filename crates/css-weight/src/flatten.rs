//! Rule Tree Flattener
//!
//! Depth-first walks over a [`RuleTree`]. Rules are de-duplicated by node
//! identity, selectors by string equality.

use std::collections::HashSet;

use crate::rule_tree::{NodeId, RuleNode, RuleTree};
use crate::{CssWeightError, Result};

/// Leaf style rules of the whole tree, flattened to one level in
/// depth-first order. Grouping rules never appear, only the style rules
/// reachable under them.
pub fn flatten_leaf_rules(tree: Option<&RuleTree>) -> Result<Vec<&RuleNode>> {
    let tree = tree.ok_or(CssWeightError::MissingRuleTree)?;
    Ok(collect(tree, tree.roots()))
}

/// Leaf style rules nested under `scope`.
///
/// Fails when `scope` is not in the tree or has no nested rule collection.
pub fn flatten_leaf_rules_under(tree: &RuleTree, scope: NodeId) -> Result<Vec<&RuleNode>> {
    let rules = tree
        .get(scope)
        .and_then(RuleNode::rules)
        .ok_or(CssWeightError::MissingRuleTree)?;
    Ok(collect(tree, rules))
}

/// Distinct selector texts of the leaf rules, first occurrence order
pub fn unique_selectors(tree: Option<&RuleTree>) -> Result<Vec<&str>> {
    let mut seen = HashSet::new();
    Ok(flatten_leaf_rules(tree)?
        .into_iter()
        .filter_map(RuleNode::selector_text)
        .filter(|selector| seen.insert(*selector))
        .collect())
}

/// Grouping rules that directly enclose at least one leaf rule.
///
/// Only the immediate parent of each leaf is considered, and only when it
/// carries a name or a condition.
pub fn enclosing_at_rules(tree: Option<&RuleTree>) -> Result<Vec<&RuleNode>> {
    let tree = tree.ok_or(CssWeightError::MissingRuleTree)?;
    let leaves = flatten_leaf_rules(Some(tree))?;

    let mut seen = HashSet::new();
    Ok(leaves
        .into_iter()
        .filter_map(|leaf| tree.parent(leaf.id))
        .filter(|parent| {
            parent
                .grouping()
                .is_some_and(|rule| rule.is_named_or_conditional())
        })
        .filter(|parent| seen.insert(parent.id))
        .collect())
}

fn collect<'t>(tree: &'t RuleTree, rules: &[NodeId]) -> Vec<&'t RuleNode> {
    let mut seen = HashSet::new();
    let mut leaves = Vec::new();
    collect_into(tree, rules, &mut seen, &mut leaves);
    tracing::debug!("Flattened {} leaf rules", leaves.len());
    leaves
}

fn collect_into<'t>(
    tree: &'t RuleTree,
    rules: &[NodeId],
    seen: &mut HashSet<NodeId>,
    leaves: &mut Vec<&'t RuleNode>,
) {
    for node in rules.iter().filter_map(|&id| tree.get(id)) {
        if node.selector_text().is_some() && seen.insert(node.id) {
            leaves.push(node);
        }
        if let Some(children) = node.rules() {
            collect_into(tree, children, seen, leaves);
        }
    }
}
