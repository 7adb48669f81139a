//! Css tokenizer
//!
//! Styles depend on where a token sits: identifiers before a `{` are selectors,
//! inside a rule block they are property names until the `:` and values after
//! it. Blocks opened by an at-rule (`@media { ... }`) contain selectors again.

use crate::mode::{Indent, Mode};
use crate::options::ModeOptions;
use crate::stream::StringStream;
use crate::style::Style;
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Lexeme {
    #[token("/*")]
    CommentOpen,
    #[regex(r#"["']"#)]
    Quote,
    #[regex(r"-?[0-9][0-9.]*[a-zA-Z%]*")]
    #[regex(r"-?\.[0-9][0-9]*[a-zA-Z%]*")]
    Number,
    #[regex(r"#[A-Za-z0-9_\-]+")]
    Hash,
    #[regex(r"@[A-Za-z_\-][A-Za-z0-9_\-]*")]
    AtKeyword,
    #[regex(r"-?-?[A-Za-z_][A-Za-z0-9_\-]*")]
    Ident,
    #[regex(r"\.[A-Za-z_\-][A-Za-z0-9_\-]*")]
    Class,
    #[regex(r"![ \t]*important")]
    Important,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[regex(r"[>+~*=\[\]/|\^$]")]
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tokenize {
    Base,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// Declarations of a rule.
    Block,
    /// Body of an at-rule, holding nested rules.
    AtBlock,
    Parens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    kind: FrameKind,
    indented: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssState {
    tokenize: Tokenize,
    stack: Vec<Frame>,
    in_value: bool,
    pseudo: bool,
    at_rule_prelude: bool,
    base_indent: usize,
    line_indent: usize,
}

impl CssState {
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn in_declarations(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|frame| frame.kind != FrameKind::Parens)
            .is_some_and(|frame| frame.kind == FrameKind::Block)
    }
}

#[derive(Debug, Clone)]
pub struct CssMode {
    indent_unit: usize,
}

impl CssMode {
    pub fn new(options: &ModeOptions) -> Self {
        CssMode {
            indent_unit: options.indent_unit,
        }
    }
}

impl Default for CssMode {
    fn default() -> Self {
        CssMode::new(&ModeOptions::default())
    }
}

impl Mode for CssMode {
    type State = CssState;

    fn name(&self) -> &'static str {
        "css"
    }

    fn start_state(&self, base_indent: usize) -> CssState {
        CssState {
            tokenize: Tokenize::Base,
            stack: Vec::new(),
            in_value: false,
            pseudo: false,
            at_rule_prelude: false,
            base_indent,
            line_indent: base_indent,
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut CssState) -> Option<Style> {
        if stream.sol() {
            state.line_indent = stream.indentation();
        }
        if state.tokenize == Tokenize::Comment {
            return Some(comment(stream, state));
        }
        if stream.eat_space() {
            return None;
        }

        let mut lexer = Lexeme::lexer(stream.rest());
        let lexeme = match lexer.next() {
            Some(Ok(lexeme)) => lexeme,
            Some(Err(())) => {
                stream.next();
                return None;
            }
            None => return None,
        };
        stream.advance(lexer.span().end);

        let pseudo = std::mem::take(&mut state.pseudo);
        match lexeme {
            Lexeme::CommentOpen => {
                state.tokenize = Tokenize::Comment;
                state.pseudo = pseudo;
                Some(comment(stream, state))
            }
            Lexeme::Quote => {
                let quote = stream.current().chars().next().unwrap_or('"');
                Some(string(stream, quote))
            }
            Lexeme::Number => Some(Style::Number),
            Lexeme::Hash => Some(if state.in_value { Style::Atom } else { Style::Builtin }),
            Lexeme::AtKeyword => {
                state.at_rule_prelude = true;
                Some(Style::Def)
            }
            Lexeme::Ident => Some(if pseudo {
                Style::Qualifier
            } else if !state.in_declarations() {
                Style::Tag
            } else if state.in_value {
                Style::Atom
            } else {
                Style::Property
            }),
            Lexeme::Class => Some(Style::Qualifier),
            Lexeme::Important => Some(Style::Keyword),
            Lexeme::OpenBrace => {
                let kind = if std::mem::take(&mut state.at_rule_prelude) {
                    FrameKind::AtBlock
                } else {
                    FrameKind::Block
                };
                state.stack.push(Frame {
                    kind,
                    indented: state.line_indent,
                });
                state.in_value = false;
                None
            }
            Lexeme::CloseBrace => {
                while let Some(frame) = state.stack.pop() {
                    if frame.kind != FrameKind::Parens {
                        break;
                    }
                }
                state.in_value = false;
                None
            }
            Lexeme::OpenParen => {
                state.stack.push(Frame {
                    kind: FrameKind::Parens,
                    indented: state.line_indent,
                });
                None
            }
            Lexeme::CloseParen => {
                if state.stack.last().is_some_and(|frame| frame.kind == FrameKind::Parens) {
                    state.stack.pop();
                }
                None
            }
            Lexeme::Colon => {
                if state.in_declarations() {
                    state.in_value = true;
                } else {
                    state.pseudo = true;
                }
                None
            }
            Lexeme::Semicolon => {
                state.in_value = false;
                state.at_rule_prelude = false;
                None
            }
            Lexeme::Comma => None,
            Lexeme::Operator => Some(Style::Operator),
        }
    }

    fn indent(&self, state: &CssState, text_after: &str) -> Indent {
        if state.tokenize == Tokenize::Comment {
            return Indent::Pass;
        }
        let Some(top) = state.stack.last() else {
            return Indent::Column(state.base_indent);
        };
        let text_after = text_after.trim_start();
        let closing = match top.kind {
            FrameKind::Parens => text_after.starts_with(')'),
            FrameKind::Block | FrameKind::AtBlock => text_after.starts_with('}'),
        };
        if closing {
            Indent::Column(top.indented)
        } else {
            Indent::Column(top.indented + self.indent_unit)
        }
    }

    fn electric_chars(&self) -> &'static str {
        "}"
    }
}

fn string(stream: &mut StringStream<'_>, quote: char) -> Style {
    let mut escaped = false;
    while let Some(ch) = stream.next() {
        if ch == quote && !escaped {
            break;
        }
        escaped = !escaped && ch == '\\';
    }
    Style::String
}

fn comment(stream: &mut StringStream<'_>, state: &mut CssState) -> Style {
    while !stream.eol() {
        if stream.match_str("*/", true, false) {
            state.tokenize = Tokenize::Base;
            break;
        }
        stream.next();
    }
    Style::Comment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(mode: &CssMode, state: &mut CssState, line: &str) -> Vec<(String, Option<Style>)> {
        let mut stream = StringStream::new(line);
        let mut out = Vec::new();
        while !stream.eol() {
            stream.start_token();
            let style = mode.token(&mut stream, state);
            if !stream.current().trim().is_empty() {
                out.push((stream.current().to_string(), style));
            }
        }
        out
    }

    fn styled(text: &str, style: Option<Style>) -> (String, Option<Style>) {
        (text.to_string(), style)
    }

    #[test]
    fn test_rule() {
        let mode = CssMode::default();
        let mut state = mode.start_state(0);
        let out = significant(&mode, &mut state, "body { color: red; margin: 0 4px !important }");
        assert_eq!(
            out,
            vec![
                styled("body", Some(Style::Tag)),
                styled("{", None),
                styled("color", Some(Style::Property)),
                styled(":", None),
                styled("red", Some(Style::Atom)),
                styled(";", None),
                styled("margin", Some(Style::Property)),
                styled(":", None),
                styled("0", Some(Style::Number)),
                styled("4px", Some(Style::Number)),
                styled("!important", Some(Style::Keyword)),
                styled("}", None),
            ]
        );
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_selectors() {
        let mode = CssMode::default();
        let mut state = mode.start_state(0);
        let out = significant(&mode, &mut state, "a.link:hover > #main");
        assert_eq!(
            out,
            vec![
                styled("a", Some(Style::Tag)),
                styled(".link", Some(Style::Qualifier)),
                styled(":", None),
                styled("hover", Some(Style::Qualifier)),
                styled(">", Some(Style::Operator)),
                styled("#main", Some(Style::Builtin)),
            ]
        );
    }

    #[test]
    fn test_at_rule_block_holds_selectors() {
        let mode = CssMode::default();
        let mut state = mode.start_state(0);
        let out = significant(&mode, &mut state, "@media screen { p { color: #fff } }");
        assert_eq!(out[0], styled("@media", Some(Style::Def)));
        assert_eq!(out[3], styled("p", Some(Style::Tag)));
        assert_eq!(out[7], styled("#fff", Some(Style::Atom)));
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_comment_spans_lines() {
        let mode = CssMode::default();
        let mut state = mode.start_state(0);
        let out = significant(&mode, &mut state, "p /* one");
        assert_eq!(out[1], styled("/* one", Some(Style::Comment)));
        assert_eq!(mode.indent(&state, "two */"), Indent::Pass);
        let out = significant(&mode, &mut state, "two */ {");
        assert_eq!(out[0], styled("two */", Some(Style::Comment)));
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_indent() {
        let mode = CssMode::default();
        let mut state = mode.start_state(4);
        assert_eq!(mode.indent(&state, "p {"), Indent::Column(4));
        significant(&mode, &mut state, "    p {");
        assert_eq!(mode.indent(&state, "color: red;"), Indent::Column(6));
        assert_eq!(mode.indent(&state, "}"), Indent::Column(4));
    }
}
