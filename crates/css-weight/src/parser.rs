//! CSS Parser using lightningcss
//!
//! Parses a stylesheet and converts it into a [`RuleTree`]: style rules keep
//! their selector list and grouping at-rules their prelude, both as written
//! in the source (comments dropped).

use std::sync::LazyLock;

use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{CssRule, Location};
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use regex::Regex;

use crate::rule_tree::{GroupingRule, NodeId, RuleTree, RuleTreeBuilder};
use crate::{CssWeightError, Result};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/\*(?s:.*?)\*/\s*").expect("Invalid comment regex"));

/// CSS Parser
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<RuleTree> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| {
            CssWeightError::Parse {
                message: e.to_string(),
            }
        })?;

        let mut builder = RuleTreeBuilder::new();
        self.convert_rules(css, &stylesheet.rules.0, None, &mut builder)?;

        let tree = builder.build();
        tracing::debug!("Parsed {} rule nodes", tree.len());
        Ok(tree)
    }

    fn convert_rules(
        &self,
        source: &str,
        rules: &[CssRule<'_>],
        parent: Option<NodeId>,
        builder: &mut RuleTreeBuilder,
    ) -> Result<()> {
        for rule in rules {
            self.convert_rule(source, rule, parent, builder)?;
        }
        Ok(())
    }

    fn convert_rule(
        &self,
        source: &str,
        rule: &CssRule<'_>,
        parent: Option<NodeId>,
        builder: &mut RuleTreeBuilder,
    ) -> Result<()> {
        let (nested, loc) = match rule {
            CssRule::Style(style_rule) => {
                // The printer rewrites selectors too (`2n+1` becomes `odd`).
                let selector_text = match source_rule_text(source, &style_rule.loc) {
                    Some(text) if !text.starts_with('@') => text,
                    _ => print(&style_rule.selectors)?,
                };
                let id = builder.style(parent, &selector_text)?;
                return self.convert_rules(source, &style_rule.rules.0, Some(id), builder);
            }
            CssRule::Media(media) => (&media.rules.0, &media.loc),
            CssRule::Supports(supports) => (&supports.rules.0, &supports.loc),
            CssRule::Container(container) => (&container.rules.0, &container.loc),
            CssRule::LayerBlock(layer) => (&layer.rules.0, &layer.loc),
            CssRule::Scope(scope) => (&scope.rules.0, &scope.loc),
            CssRule::StartingStyle(starting_style) => (&starting_style.rules.0, &starting_style.loc),
            CssRule::MozDocument(document) => (&document.rules.0, &document.loc),
            CssRule::Ignored => return Ok(()),
            other => {
                let keyword = GroupingRule::from_prelude(&printed_prelude(other)?)
                    .map(|rule| rule.keyword)
                    .unwrap_or_default();
                builder.other(parent, &keyword)?;
                return Ok(());
            }
        };

        // The printer normalizes conditions (`min-width` becomes range
        // syntax), so prefer the prelude as written.
        let prelude = match source_rule_text(source, loc) {
            Some(prelude) if prelude.starts_with('@') => prelude,
            _ => printed_prelude(rule)?,
        };
        let grouping = GroupingRule::from_prelude(&prelude).ok_or_else(|| CssWeightError::Parse {
            message: format!("unrecognized at-rule prelude {prelude:?}"),
        })?;

        let id = builder.grouping(parent, grouping)?;
        self.convert_rules(source, nested, Some(id), builder)
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

fn print<T: ToCss>(value: &T) -> Result<String> {
    value
        .to_css_string(PrinterOptions::default())
        .map_err(|e| CssWeightError::Parse {
            message: e.to_string(),
        })
}

/// Printed rule text up to its block
fn printed_prelude(rule: &CssRule<'_>) -> Result<String> {
    let printed = print(rule)?;
    let end = printed.find(['{', ';']).unwrap_or(printed.len());
    Ok(printed[..end].trim().to_string())
}

/// Rule text as written at `loc`, up to its block, without comments
fn source_rule_text(source: &str, loc: &Location) -> Option<String> {
    let start = source_offset(source, loc.line, loc.column)?;
    let rest = &source[start..];
    let text = COMMENT.replace_all(&rest[..block_start(rest)?], " ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Byte offset of the first `{` or `;` outside strings and comments
fn block_start(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    let mut quote = None;

    while let Some((offset, ch)) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '/') if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                chars.next();
                let mut prev = ' ';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            (None, '{' | ';') => return Some(offset),
            _ => {}
        }
    }
    None
}

/// Byte offset of a 0-based line and 1-based UTF-16 column
fn source_offset(source: &str, line: u32, column: u32) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut line_start = 0;
    let mut current_line = 0;

    while current_line < line {
        match *bytes.get(line_start)? {
            b'\n' | b'\x0C' => {
                line_start += 1;
                current_line += 1;
            }
            b'\r' => {
                line_start += 1;
                if bytes.get(line_start) == Some(&b'\n') {
                    line_start += 1;
                }
                current_line += 1;
            }
            _ => line_start += 1,
        }
    }

    let mut units = 1;
    for (offset, ch) in source[line_start..].char_indices() {
        if units >= column {
            return Some(line_start + offset);
        }
        units += ch.len_utf16() as u32;
    }
    (units == column).then_some(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_tree::RuleKind;

    #[test]
    fn test_parse_simple() {
        let css = r#"
            .foo { display: block; }
            #bar { color: red; }
        "#;

        let tree = CssParser::new().parse(css).unwrap();
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.get(tree.roots()[0]).unwrap().selector_text(), Some(".foo"));
        assert_eq!(tree.get(tree.roots()[1]).unwrap().selector_text(), Some("#bar"));
    }

    #[test]
    fn test_parse_media_block() {
        let css = "@media screen and (min-width: 480px) { body { color: blue; } h1 { color: red; } }";

        let tree = CssParser::new().parse(css).unwrap();
        let media = tree.get(tree.roots()[0]).unwrap();
        let grouping = media.grouping().unwrap();

        assert_eq!(grouping.keyword, "media");
        assert_eq!(grouping.condition_text.as_deref(), Some("screen and (min-width: 480px)"));
        assert_eq!(grouping.prelude(), "@media screen and (min-width: 480px)");
        assert_eq!(media.children.len(), 2);
        assert_eq!(tree.parent(media.children[0]).unwrap().id, media.id);
    }

    #[test]
    fn test_parse_supports_and_layer() {
        let css = r#"
            @layer base { a { color: red; } }
            @supports (display: grid) { .grid { display: grid; } }
        "#;

        let tree = CssParser::new().parse(css).unwrap();
        let layer = tree.get(tree.roots()[0]).unwrap().grouping().unwrap();
        let supports = tree.get(tree.roots()[1]).unwrap().grouping().unwrap();

        assert_eq!(layer.name.as_deref(), Some("base"));
        assert_eq!(supports.keyword, "supports");
        assert!(supports.condition_text.is_some());
    }

    #[test]
    fn test_parse_other_at_rules() {
        let css = r#"
            @font-face { font-family: Foo; src: url(foo.woff); }
            @keyframes spin { from { opacity: 0; } to { opacity: 1; } }
        "#;

        let tree = CssParser::new().parse(css).unwrap();
        let keywords: Vec<_> = tree
            .iter()
            .map(|node| match &node.kind {
                RuleKind::Other { keyword } => keyword.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(keywords, vec!["font-face", "keyframes"]);
    }

    #[test]
    fn test_parse_nested_style_rules() {
        let css = ".card { color: red; & .title { color: blue; } }";

        let tree = CssParser::new().parse(css).unwrap();
        let card = tree.get(tree.roots()[0]).unwrap();
        assert_eq!(card.selector_text(), Some(".card"));
        assert_eq!(card.children.len(), 1);
    }

    #[test]
    fn test_selector_text_as_written() {
        let css = "li:nth-child(2n+1),\n[data-x=\"{\"] { color: red; }\nINPUT[Type=text] { color: blue; }";

        let tree = CssParser::new().parse(css).unwrap();
        let selectors: Vec<_> = tree.iter().filter_map(|node| node.selector_text()).collect();
        assert_eq!(selectors, vec!["li:nth-child(2n+1),\n[data-x=\"{\"]", "INPUT[Type=text]"]);
    }

    #[test]
    fn test_comments_are_dropped_from_rule_text() {
        let css = "@media /* narrow */ print { a /* link */ > b { color: red; } }";

        let tree = CssParser::new().parse(css).unwrap();
        let media = tree.get(tree.roots()[0]).unwrap();
        assert_eq!(media.grouping().unwrap().condition_text.as_deref(), Some("print"));
        assert_eq!(tree.get(media.children[0]).unwrap().selector_text(), Some("a > b"));
    }

    #[test]
    fn test_block_start() {
        assert_eq!(block_start("a > b { }"), Some(6));
        assert_eq!(block_start(r#"[title="a;b"] {"#), Some(14));
        assert_eq!(block_start("a /* { */ b {"), Some(12));
        assert_eq!(block_start("@import url(x.css);"), Some(18));
        assert_eq!(block_start("a"), None);
    }

    #[test]
    fn test_parse_error() {
        let result = CssParser::new().parse("..foo { color: red; }");
        assert!(matches!(result, Err(CssWeightError::Parse { .. })));
    }
}
