//! At-rule Tokenizer & Scorer
//!
//! Splits at-rule condition text into typed tokens and sums a weight from
//! them. Classification is vocabulary driven, see [`crate::vocabulary`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::sanitize::sanitize_at_rule;
use crate::vocabulary::{is_conditional, Vocabulary};
use crate::{CssWeightError, Result};

static RULE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("Invalid at-rule type regex"));

/// Classified piece of an at-rule's condition text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AtRuleToken {
    /// The at-rule keyword itself (`@media`)
    At { value: String, is_conditional: bool },
    /// A media type or feature; `is_range` marks parenthesized expressions
    Feature { value: String, is_range: bool },
    /// A logical operator (`and`, `not`, `only`, `or`, `,`)
    Operator { value: String },
}

impl AtRuleToken {
    pub fn value(&self) -> &str {
        match self {
            Self::At { value, .. } | Self::Feature { value, .. } | Self::Operator { value } => value,
        }
    }

    /// Contribution to [`at_rule_weight`]. Range features refine an
    /// already-counted feature and weigh nothing.
    pub fn weight(&self) -> usize {
        match self {
            Self::Feature { is_range: true, .. } => 0,
            _ => 1,
        }
    }
}

/// Type of an at-rule (`"media"` for `@media ...`).
///
/// Returns `Ok(None)` for empty input and fails when the sanitized text
/// carries no `@word` marker.
pub fn get_at_rule_type(raw: &str) -> Result<Option<String>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let sanitized = sanitize_at_rule(raw);
    let marker = RULE_TYPE
        .find(&sanitized)
        .ok_or_else(|| CssWeightError::AtRuleTypeNotFound { text: raw.to_string() })?;

    Ok(Some(marker.as_str()[1..].to_string()))
}

/// Condition text of an at-rule, taken from the unsanitized input.
///
/// The split key is the sanitized (lowercase) type, so a differently cased
/// keyword in `raw` (`@Media`) does not split and yields `Ok(None)`.
pub fn get_condition_text(raw: &str) -> Result<Option<String>> {
    let Some(at_rule_type) = get_at_rule_type(raw)? else {
        return Ok(None);
    };

    Ok(raw
        .split(at_rule_type.as_str())
        .nth(1)
        .map(|condition| condition.trim().to_string()))
}

/// Classify a single token as an at-rule keyword.
///
/// The token must contain an at-rule type keyword and an `@word` marker.
pub fn tokenize_at_type(token: &str) -> Option<AtRuleToken> {
    let sanitized = sanitize_at_rule(token);
    if !Vocabulary::AtRuleType.matches(&sanitized) {
        return None;
    }

    let at_rule_type = match get_at_rule_type(&sanitized) {
        Ok(Some(at_rule_type)) => at_rule_type,
        _ => return None,
    };

    Some(AtRuleToken::At {
        is_conditional: is_conditional(&at_rule_type),
        value: at_rule_type,
    })
}

/// Tokenize at-rule text.
///
/// Tokens are tried against the at-rule types, then media features, then
/// operators, then the parenthesized-range shape; unmatched tokens are
/// dropped.
pub fn tokenize_at_rule(raw: &str) -> Vec<AtRuleToken> {
    sanitize_at_rule(raw)
        .split(' ')
        .filter_map(classify)
        .collect()
}

fn classify(token: &str) -> Option<AtRuleToken> {
    if Vocabulary::AtRuleType.matches(token) {
        return tokenize_at_type(token);
    }

    if Vocabulary::MediaFeature.matches(token) {
        return Some(AtRuleToken::Feature {
            value: token.to_string(),
            is_range: false,
        });
    }

    if Vocabulary::Operator.matches(token) {
        return Some(AtRuleToken::Operator {
            value: token.to_string(),
        });
    }

    if token.contains('(') && token.contains(')') {
        return Some(AtRuleToken::Feature {
            value: token.to_string(),
            is_range: true,
        });
    }

    None
}

/// Weight of an at-rule: one per at keyword, plain feature and operator.
pub fn at_rule_weight(raw: &str) -> usize {
    tokenize_at_rule(raw).iter().map(AtRuleToken::weight).sum()
}

/// An at-rule prelude such as `@media screen and (min-width: 900px)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtRule {
    text: String,
}

impl AtRule {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn at_rule_type(&self) -> Result<Option<String>> {
        get_at_rule_type(&self.text)
    }

    pub fn condition_text(&self) -> Result<Option<String>> {
        get_condition_text(&self.text)
    }

    pub fn tokens(&self) -> Vec<AtRuleToken> {
        tokenize_at_rule(&self.text)
    }

    pub fn weight(&self) -> usize {
        at_rule_weight(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QUERY: &str = "@media screen and (min-width: 900px)";

    fn at(value: &str, is_conditional: bool) -> AtRuleToken {
        AtRuleToken::At { value: value.to_string(), is_conditional }
    }

    fn feature(value: &str, is_range: bool) -> AtRuleToken {
        AtRuleToken::Feature { value: value.to_string(), is_range }
    }

    fn operator(value: &str) -> AtRuleToken {
        AtRuleToken::Operator { value: value.to_string() }
    }

    #[test]
    fn test_at_rule_type() {
        assert_eq!(get_at_rule_type(QUERY).unwrap(), Some("media".to_string()));
        assert_eq!(get_at_rule_type("  @SUPPORTS (display: grid)").unwrap(), Some("supports".to_string()));
        assert_eq!(get_at_rule_type("").unwrap(), None);
    }

    #[test]
    fn test_at_rule_type_requires_marker() {
        let err = get_at_rule_type("screen and (min-width: 900px)").unwrap_err();
        assert!(matches!(err, CssWeightError::AtRuleTypeNotFound { .. }));
    }

    #[test]
    fn test_condition_text_keeps_original_spelling() {
        assert_eq!(
            get_condition_text(QUERY).unwrap(),
            Some("screen and (min-width: 900px)".to_string())
        );
        assert_eq!(
            get_condition_text("@supports  (Display: Grid)").unwrap(),
            Some("(Display: Grid)".to_string())
        );
        assert_eq!(get_condition_text("").unwrap(), None);
    }

    #[test]
    fn test_condition_text_with_mixed_case_keyword_does_not_split() {
        assert_eq!(get_at_rule_type("@Media print").unwrap(), Some("media".to_string()));
        assert_eq!(get_condition_text("@Media print").unwrap(), None);
    }

    #[test]
    fn test_tokenize_at_type() {
        assert_eq!(tokenize_at_type("@MEDIA"), Some(at("media", true)));
        assert_eq!(tokenize_at_type("@layer"), Some(at("layer", false)));
        assert_eq!(tokenize_at_type("@bogus"), None);
        assert_eq!(tokenize_at_type("media"), None);
    }

    #[test]
    fn test_tokenize_media_query() {
        assert_eq!(
            tokenize_at_rule(QUERY),
            vec![
                at("media", true),
                feature("screen", false),
                operator("and"),
                feature("(min-width:900px)", true),
            ]
        );
    }

    #[test]
    fn test_token_values() {
        let tokens = tokenize_at_rule("@MEDIA Screen, PRINT");
        let values: Vec<&str> = tokens
            .iter()
            .map(AtRuleToken::value)
            .collect();
        assert_eq!(values, vec!["media", "screen,", "print"]);
    }

    #[test]
    fn test_tokenize_drops_unknown_tokens() {
        assert_eq!(tokenize_at_rule("@layer base"), vec![at("layer", false)]);
        assert_eq!(tokenize_at_rule(""), vec![]);
    }

    #[test]
    fn test_tokenize_supports() {
        assert_eq!(
            tokenize_at_rule("@supports (display: grid) and (not (display:inline-grid))"),
            vec![
                at("supports", true),
                feature("(display:grid)", true),
                operator("and"),
                operator("(not"),
                feature("(display:inline-grid))", true),
            ]
        );
    }

    #[test]
    fn test_operator_match_wins_over_range_shape() {
        let tokens = tokenize_at_rule("@media print, screen and (orientation: landscape)");
        assert_eq!(tokens[1], feature("print,", false));
        assert_eq!(tokens[4], operator("(orientation:landscape)"));
        assert_eq!(at_rule_weight("@media print, screen and (orientation: landscape)"), 5);
    }

    #[test]
    fn test_weights() {
        assert_eq!(at_rule_weight(QUERY), 3);
        assert_eq!(at_rule_weight("screen and (min-width:900px)"), 2);
        assert_eq!(at_rule_weight("@media only screen and (min-width: 480px) and (max-width: 900px)"), 5);
        assert_eq!(at_rule_weight(""), 0);
    }

    #[test]
    fn test_at_rule_struct() {
        let rule = AtRule::new("  @media screen and (min-width: 900px) ");
        assert_eq!(rule.text(), QUERY);
        assert_eq!(rule.at_rule_type().unwrap(), Some("media".to_string()));
        assert_eq!(rule.condition_text().unwrap(), Some("screen and (min-width: 900px)".to_string()));
        assert_eq!(rule.tokens().len(), 4);
        assert_eq!(rule.weight(), 3);
    }

    #[test]
    fn test_token_serializes_with_kind_tag() {
        let json = serde_json::to_string(&feature("(min-width:900px)", true)).unwrap();
        assert_eq!(json, r#"{"kind":"feature","value":"(min-width:900px)","isRange":true}"#);
    }
}
