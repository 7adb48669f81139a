//! Javascript tokenizer
//!
//! Lexemes are recognised by logos on the rest of the line. Strings, block
//! comments and template literals are scanned by hand, the latter two because
//! they carry over to following lines. Bracket nesting is tracked for
//! indentation.

use crate::mode::{Indent, Mode};
use crate::options::ModeOptions;
use crate::stream::StringStream;
use crate::style::Style;
use logos::Logos;

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "of", "return", "static", "super", "switch",
    "throw", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Keywords whose next identifier is a definition.
const DECLARATORS: &[&str] = &["var", "let", "const", "function", "class"];

const ATOMS: &[&str] = &["true", "false", "null", "undefined", "NaN", "Infinity", "this"];

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Lexeme {
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*")]
    BlockCommentOpen,
    #[regex(r#"["']"#)]
    Quote,
    #[token("`")]
    Backtick,
    // Every prefix of a number is itself a number, so the lexer never has to back off.
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*")]
    Number,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
    #[regex(r"[{(\[]")]
    Open,
    #[regex(r"[})\]]")]
    Close,
    #[token(".")]
    Dot,
    #[regex(r"[;,:?]")]
    Punct,
    #[regex(r"[+\-*%=&|^~<>!]+")]
    Operator,
    #[token("/")]
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tokenize {
    Base,
    BlockComment,
    Template,
}

/// What the previous significant token was, for styling identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    None,
    Dot,
    Declarator,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Lexical {
    /// The bracket that closes this level.
    bracket: char,
    indented: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsState {
    tokenize: Tokenize,
    lexical: Vec<Lexical>,
    base_indent: usize,
    line_indent: usize,
    last: Last,
}

impl JsState {
    /// Bracket nesting depth.
    pub fn depth(&self) -> usize {
        self.lexical.len()
    }

    pub fn in_comment(&self) -> bool {
        self.tokenize == Tokenize::BlockComment
    }
}

#[derive(Debug, Clone)]
pub struct JavaScriptMode {
    indent_unit: usize,
}

impl JavaScriptMode {
    pub fn new(options: &ModeOptions) -> Self {
        JavaScriptMode {
            indent_unit: options.indent_unit,
        }
    }
}

impl Default for JavaScriptMode {
    fn default() -> Self {
        JavaScriptMode::new(&ModeOptions::default())
    }
}

impl Mode for JavaScriptMode {
    type State = JsState;

    fn name(&self) -> &'static str {
        "javascript"
    }

    fn start_state(&self, base_indent: usize) -> JsState {
        JsState {
            tokenize: Tokenize::Base,
            lexical: Vec::new(),
            base_indent,
            line_indent: base_indent,
            last: Last::None,
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut JsState) -> Option<Style> {
        if stream.sol() {
            state.line_indent = stream.indentation();
        }
        match state.tokenize {
            Tokenize::BlockComment => return Some(block_comment(stream, state)),
            Tokenize::Template => return Some(template(stream, state)),
            Tokenize::Base => {}
        }
        if stream.eat_space() {
            return None;
        }

        let mut lexer = Lexeme::lexer(stream.rest());
        let lexeme = match lexer.next() {
            Some(Ok(lexeme)) => lexeme,
            Some(Err(())) => {
                stream.next();
                state.last = Last::Other;
                return None;
            }
            None => return None,
        };
        stream.advance(lexer.span().end);

        let (style, last) = match lexeme {
            Lexeme::LineComment => return Some(Style::Comment),
            Lexeme::BlockCommentOpen => {
                state.tokenize = Tokenize::BlockComment;
                return Some(block_comment(stream, state));
            }
            Lexeme::Backtick => {
                state.tokenize = Tokenize::Template;
                (Some(template(stream, state)), Last::Other)
            }
            Lexeme::Quote => {
                let quote = stream.current().chars().next().unwrap_or('"');
                (Some(string(stream, quote)), Last::Other)
            }
            Lexeme::Number => (Some(Style::Number), Last::Other),
            Lexeme::Word => word(stream.current(), state.last),
            Lexeme::Open => {
                let bracket = match stream.current() {
                    "{" => '}',
                    "(" => ')',
                    _ => ']',
                };
                state.lexical.push(Lexical {
                    bracket,
                    indented: state.line_indent,
                });
                (None, Last::Other)
            }
            Lexeme::Close => {
                let closing = stream.current().chars().next();
                if state.lexical.last().map(|lex| lex.bracket) == closing {
                    state.lexical.pop();
                }
                (None, Last::Other)
            }
            Lexeme::Dot => (None, Last::Dot),
            Lexeme::Punct => (None, Last::Other),
            Lexeme::Operator | Lexeme::Slash => (Some(Style::Operator), Last::Other),
        };
        state.last = last;
        style
    }

    fn indent(&self, state: &JsState, text_after: &str) -> Indent {
        if state.tokenize != Tokenize::Base {
            return Indent::Pass;
        }
        let Some(top) = state.lexical.last() else {
            return Indent::Column(state.base_indent);
        };
        if text_after.trim_start().starts_with(top.bracket) {
            Indent::Column(top.indented)
        } else {
            Indent::Column(top.indented + self.indent_unit)
        }
    }

    fn electric_chars(&self) -> &'static str {
        "{}"
    }
}

fn word(text: &str, last: Last) -> (Option<Style>, Last) {
    if last != Last::Dot && KEYWORDS.contains(&text) {
        let next = if DECLARATORS.contains(&text) {
            Last::Declarator
        } else {
            Last::Other
        };
        return (Some(Style::Keyword), next);
    }
    if last != Last::Dot && ATOMS.contains(&text) {
        return (Some(Style::Atom), Last::Other);
    }
    let style = match last {
        Last::Dot => Style::Property,
        Last::Declarator => Style::Def,
        Last::None | Last::Other => Style::Variable,
    };
    (Some(style), Last::Other)
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

fn block_comment(stream: &mut StringStream<'_>, state: &mut JsState) -> Style {
    while !stream.eol() {
        if stream.match_str("*/", true, false) {
            state.tokenize = Tokenize::Base;
            break;
        }
        stream.next();
    }
    Style::Comment
}

fn template(stream: &mut StringStream<'_>, state: &mut JsState) -> Style {
    let mut escaped = false;
    while let Some(ch) = stream.next() {
        if ch == '`' && !escaped {
            state.tokenize = Tokenize::Base;
            break;
        }
        escaped = !escaped && ch == '\\';
    }
    Style::String
}
