//! At-rule Vocabulary
//!
//! Closed keyword sets used to classify condition tokens. Matching is a
//! case-insensitive containment test: a token matches a set when it contains
//! any of the set's keywords anywhere.

/// At-rule types
pub const AT_RULE_TYPES: &[&str] = &[
    "charset",
    "counter-style",
    "document",
    "font-face",
    "font-feature-values",
    "import",
    "keyframes",
    "layer",
    "media",
    "name-space",
    "page",
    "property",
    "scope",
    "starting-style",
    "supports",
];

/// At-rule types whose condition text carries meaning
pub const CONDITIONAL_AT_RULES: &[&str] = &["media", "scope", "starting-style", "supports", "document"];

/// Media types and features
pub const MEDIA_FEATURES: &[&str] = &[
    "all",
    "aural",
    "braille",
    "embossed",
    "handheld",
    "print",
    "projection",
    "screen",
    "tty",
    "tv",
    "presentation",
];

/// Logical operators of a media query list
pub const OPERATORS: &[&str] = &["and", "not", "only", "or", ","];

/// A closed keyword set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    AtRuleType,
    MediaFeature,
    Operator,
}

impl Vocabulary {
    /// Keywords of this set, in declaration order
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::AtRuleType => AT_RULE_TYPES,
            Self::MediaFeature => MEDIA_FEATURES,
            Self::Operator => OPERATORS,
        }
    }

    /// First keyword of this set contained in `token`
    pub fn find(self, token: &str) -> Option<&'static str> {
        let token = token.to_lowercase();
        self.keywords()
            .iter()
            .copied()
            .find(|keyword| token.contains(keyword))
    }

    /// Whether `token` contains any keyword of this set
    pub fn matches(self, token: &str) -> bool {
        self.find(token).is_some()
    }
}

/// Whether an at-rule type belongs to the conditional subset.
///
/// Unlike [`Vocabulary::matches`] this is a whole-word comparison.
pub fn is_conditional(at_rule_type: &str) -> bool {
    CONDITIONAL_AT_RULES
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(at_rule_type))
}
