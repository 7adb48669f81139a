//! Boundary recovery
//!
//! An embedded tokenizer knows nothing about the element it is embedded in, so
//! a single token (a string, a comment, an unterminated literal) may run past
//! the `</script>` or `</style>` that ends the region. After every embedded
//! token, [guard] rolls the cursor back so that the closing tag is left for
//! the host grammar:
//!
//! - the token contains the closing tag: cut the token just before it;
//! - the token ends with `<` or `</`, or with a longer torn prefix such as
//!   `</sty` while more of the line follows: shrink the token to its first
//!   character, unless the tag starts right there.
//!
//! A longer prefix at end of line cannot be completed into a tag, so a token
//! like the unterminated string `'a </scr` is left whole.
//!
//! Either way the cursor still advances past the token start.

use crate::stream::StringStream;
use crate::style::Style;
use once_cell::sync::Lazy;
use regex::Regex;

pub static SCRIPT_CLOSE: Lazy<ClosingTag> = Lazy::new(|| ClosingTag::new("script"));
pub static STYLE_CLOSE: Lazy<ClosingTag> = Lazy::new(|| ClosingTag::new("style"));

static TORN_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?$").unwrap());

/// Matchers for the closing tag of one element.
#[derive(Debug)]
pub struct ClosingTag {
    element: &'static str,
    at_start: Regex,
    anywhere: Regex,
    partial_tail: Regex,
}

impl ClosingTag {
    fn new(element: &'static str) -> Self {
        // Every proper prefix of `</element` with optional trailing spaces, anchored at the end.
        let mut tail = String::from(r"\s*");
        for ch in element.chars().rev() {
            tail = format!("{}(?:{})?", ch, tail);
        }
        ClosingTag {
            element,
            at_start: Regex::new(&format!(r"(?i)^</\s*{}\s*>", element)).unwrap(),
            anywhere: Regex::new(&format!(r"(?i)</\s*{}\s*>", element)).unwrap(),
            partial_tail: Regex::new(&format!(r"(?i)<(?:/\s*(?:{})?)?$", tail)).unwrap(),
        }
    }

    pub fn element(&self) -> &'static str {
        self.element
    }

    /// Whether the closing tag starts at the cursor. Does not consume.
    pub fn matches_at(&self, stream: &StringStream<'_>) -> bool {
        self.at_start.is_match(stream.rest())
    }

    /// Byte offset of the first closing tag in `text`.
    pub fn find_in(&self, text: &str) -> Option<usize> {
        self.anywhere.find(text).map(|m| m.start())
    }

    /// Whether `text` ends with an incomplete closing tag. Prefixes longer than
    /// `</` only count when `more_follows`.
    pub fn is_split_tail(&self, text: &str, more_follows: bool) -> bool {
        TORN_OPENER.is_match(text) || (more_follows && self.partial_tail.is_match(text))
    }
}

/// Roll back the token just produced by an embedded tokenizer so it stops short of `closing`.
pub fn guard(stream: &mut StringStream<'_>, closing: &ClosingTag, style: Option<Style>) -> Option<Style> {
    let current = stream.current();
    match closing.find_in(current) {
        Some(offset) if offset > 0 => {
            stream.back_up(current.len() - offset);
        }
        Some(_) => {}
        None if closing.is_split_tail(current, !stream.eol()) => {
            stream.back_up(current.len());
            if !closing.matches_at(stream) {
                if let Some(first) = current.chars().next() {
                    stream.advance(first.len_utf8());
                }
            }
        }
        None => {}
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Consume `n` bytes as one token, then guard it.
    fn guarded(line: &str, n: usize, closing: &ClosingTag) -> String {
        let mut stream = StringStream::new(line);
        stream.advance(n);
        guard(&mut stream, closing, None);
        stream.current().to_string()
    }

    #[test]
    fn test_partial_tail_prefixes() {
        for tail in ["<", "</", "</ ", "</s", "</scr", "</SCRIPT", "</script  "] {
            assert!(SCRIPT_CLOSE.is_split_tail(&format!("x{}", tail), true), "{}", tail);
        }
        assert!(!SCRIPT_CLOSE.is_split_tail("x</p", true));
        assert!(!SCRIPT_CLOSE.is_split_tail("x</script>", true));
        assert!(!STYLE_CLOSE.is_split_tail("</sc", true));
    }

    #[test]
    fn test_only_short_tails_count_at_end_of_line() {
        assert!(SCRIPT_CLOSE.is_split_tail("x<", false));
        assert!(SCRIPT_CLOSE.is_split_tail("x</", false));
        assert!(!SCRIPT_CLOSE.is_split_tail("x</s", false));
        assert!(!SCRIPT_CLOSE.is_split_tail("x</scr", false));
    }

    #[test]
    fn test_cuts_before_closing_tag() {
        assert_eq!(guarded("'a</script>b'", 13, &SCRIPT_CLOSE), "'a");
        assert_eq!(guarded("x</ STYLE >", 11, &STYLE_CLOSE), "x");
    }

    #[test]
    fn test_torn_tag_shrinks_to_one_char() {
        assert_eq!(guarded("ab</scrx", 7, &SCRIPT_CLOSE), "a");
        assert_eq!(guarded("ab</", 4, &SCRIPT_CLOSE), "a");
        assert_eq!(guarded("<", 1, &SCRIPT_CLOSE), "<");
    }

    #[test]
    fn test_long_tail_at_end_of_line_is_kept() {
        assert_eq!(guarded("'a </scr", 8, &SCRIPT_CLOSE), "'a </scr");
        assert_eq!(guarded("x</STY", 6, &STYLE_CLOSE), "x</STY");
    }

    #[test]
    fn test_leaves_other_tokens_alone() {
        assert_eq!(guarded("a < b", 5, &SCRIPT_CLOSE), "a < b");
        assert_eq!(guarded("</div>", 6, &SCRIPT_CLOSE), "</div>");
    }

    #[test]
    fn test_matches_at() {
        let mut stream = StringStream::new("a</Script >");
        assert!(!SCRIPT_CLOSE.matches_at(&stream));
        stream.next();
        assert!(SCRIPT_CLOSE.matches_at(&stream));
        assert_eq!(stream.pos(), 1);
    }
}
