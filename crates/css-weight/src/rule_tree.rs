//! CSS Rule Tree
//!
//! Arena of parsed rules. Nodes are addressed by [`NodeId`]; children are
//! owned through the arena and the parent link is a plain index back into it,
//! so walking the tree never follows an owning cycle.

use crate::{CssWeightError, Result};

/// Rule node identifier, stable for the lifetime of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An at-rule that wraps nested rules (`@media`, `@supports`, `@layer`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingRule {
    /// At-keyword without `@`, vendor prefix dropped
    pub keyword: String,
    /// Name of a named grouping rule (`@layer base`)
    pub name: Option<String>,
    /// Condition of a conditional grouping rule (`screen and (...)`)
    pub condition_text: Option<String>,
}

impl GroupingRule {
    /// Keywords whose prelude is a condition rather than a name
    const CONDITIONAL: &'static [&'static str] = &["media", "supports", "container", "scope", "document"];

    pub fn conditional(keyword: &str, condition_text: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            name: None,
            condition_text: Some(condition_text.to_string()),
        }
    }

    pub fn named(keyword: &str, name: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            name: Some(name.to_string()),
            condition_text: None,
        }
    }

    pub fn anonymous(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            name: None,
            condition_text: None,
        }
    }

    /// Build from printed prelude text such as `@media screen`.
    ///
    /// Returns `None` when the text does not start with an at-keyword.
    pub fn from_prelude(prelude: &str) -> Option<Self> {
        let prelude = prelude.trim().strip_prefix('@')?;
        let end = prelude
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(prelude.len());
        let (keyword, rest) = prelude.split_at(end);
        if keyword.is_empty() {
            return None;
        }

        let keyword = strip_vendor_prefix(keyword).to_lowercase();
        let rest = rest.trim();
        if rest.is_empty() {
            return Some(Self::anonymous(&keyword));
        }

        if Self::CONDITIONAL.contains(&keyword.as_str()) {
            Some(Self::conditional(&keyword, rest))
        } else {
            Some(Self::named(&keyword, rest))
        }
    }

    /// Full prelude, e.g. `@media screen and (min-width: 480px)`
    pub fn prelude(&self) -> String {
        let mut prelude = format!("@{}", self.keyword);
        for part in [&self.name, &self.condition_text].into_iter().flatten() {
            prelude.push(' ');
            prelude.push_str(part);
        }
        prelude
    }

    /// Whether this rule carries a name or a condition
    pub fn is_named_or_conditional(&self) -> bool {
        self.name.is_some() || self.condition_text.is_some()
    }
}

fn strip_vendor_prefix(keyword: &str) -> &str {
    ["-webkit-", "-moz-", "-ms-", "-o-"]
        .iter()
        .find_map(|prefix| keyword.strip_prefix(prefix))
        .unwrap_or(keyword)
}

/// What a rule node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// A style rule; may carry nested rules
    Style { selector_text: String },
    /// A grouping at-rule
    Grouping(GroupingRule),
    /// Any other at-rule (`@font-face`, `@keyframes`, ...)
    Other { keyword: String },
}

/// Rule tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    pub id: NodeId,
    pub kind: RuleKind,
    /// Nested rules, in source order
    pub children: Vec<NodeId>,
    /// Enclosing rule, `None` at the top level
    pub parent: Option<NodeId>,
}

impl RuleNode {
    pub fn selector_text(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Style { selector_text } => Some(selector_text),
            _ => None,
        }
    }

    pub fn grouping(&self) -> Option<&GroupingRule> {
        match &self.kind {
            RuleKind::Grouping(rule) => Some(rule),
            _ => None,
        }
    }

    /// Nested rule collection. Grouping rules always have one, other rules
    /// only when something is nested in them.
    pub fn rules(&self) -> Option<&[NodeId]> {
        match self.kind {
            RuleKind::Grouping(_) => Some(&self.children),
            _ if !self.children.is_empty() => Some(&self.children),
            _ => None,
        }
    }
}

/// Parsed stylesheet as an arena of rule nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTree {
    nodes: Vec<RuleNode>,
    roots: Vec<NodeId>,
}

impl RuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level rules, in source order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn get(&self, id: NodeId) -> Option<&RuleNode> {
        self.nodes.get(id.index())
    }

    /// Enclosing node of `id`
    pub fn parent(&self, id: NodeId) -> Option<&RuleNode> {
        self.get(id)?.parent.and_then(|parent| self.get(parent))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds a [`RuleTree`] top-down; a parent must exist before its children
#[derive(Debug, Default)]
pub struct RuleTreeBuilder {
    tree: RuleTree,
}

impl RuleTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&mut self, parent: Option<NodeId>, selector_text: &str) -> Result<NodeId> {
        self.push(
            parent,
            RuleKind::Style {
                selector_text: selector_text.to_string(),
            },
        )
    }

    pub fn grouping(&mut self, parent: Option<NodeId>, rule: GroupingRule) -> Result<NodeId> {
        self.push(parent, RuleKind::Grouping(rule))
    }

    pub fn other(&mut self, parent: Option<NodeId>, keyword: &str) -> Result<NodeId> {
        self.push(
            parent,
            RuleKind::Other {
                keyword: keyword.to_string(),
            },
        )
    }

    pub fn push(&mut self, parent: Option<NodeId>, kind: RuleKind) -> Result<NodeId> {
        let id = NodeId(self.tree.nodes.len() as u32);

        match parent {
            Some(parent_id) => self
                .tree
                .nodes
                .get_mut(parent_id.index())
                .ok_or(CssWeightError::MissingRuleTree)?
                .children
                .push(id),
            None => self.tree.roots.push(id),
        }

        self.tree.nodes.push(RuleNode {
            id,
            kind,
            children: Vec::new(),
            parent,
        });
        Ok(id)
    }

    pub fn build(self) -> RuleTree {
        self.tree
    }
}
