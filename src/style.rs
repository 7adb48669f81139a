//! Token classification labels
//!
//! Every tokenizer labels the span it consumed with an optional [Style]. `None`
//! means plain content (text, whitespace, punctuation the grammar does not
//! highlight). The composite tokenizer inspects exactly one label itself:
//! [Style::Tag], which the host grammar uses for markup delimiters and names.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    // Markup
    Tag,
    Attribute,
    Meta,

    // Shared
    String,
    Comment,
    Atom,
    Number,
    Error,

    // Code
    Keyword,
    Variable,
    Def,
    Property,
    Operator,

    // Stylesheets
    Qualifier,
    Builtin,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Tag => "tag",
            Style::Attribute => "attribute",
            Style::Meta => "meta",
            Style::String => "string",
            Style::Comment => "comment",
            Style::Atom => "atom",
            Style::Number => "number",
            Style::Error => "error",
            Style::Keyword => "keyword",
            Style::Variable => "variable",
            Style::Def => "def",
            Style::Property => "property",
            Style::Operator => "operator",
            Style::Qualifier => "qualifier",
            Style::Builtin => "builtin",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serialized_name() {
        assert_eq!(Style::Tag.to_string(), "tag");
        assert_eq!(Style::Qualifier.to_string(), "qualifier");
    }
}
