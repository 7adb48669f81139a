//! Markup tokenizer (html and xml flavours)
//!
//! Tokenizing markup is split in two layers:
//!
//!     Lexical layer: `Tokenize` says which kind of text the cursor is in (text,
//!     inside a tag, inside a quoted attribute value, inside a comment/CDATA/
//!     processing instruction block, inside a doctype). Each variant recognises
//!     one token and reports a [Lexeme] alongside the style.
//!
//!     Tag layer: `Phase` walks the lexemes of a tag (name, attributes, `=`,
//!     values, closing `>`), refines the style of words (tag name, attribute,
//!     unquoted value, error) and maintains the stack of open elements.
//!
//! Open elements form a linked [Context] chain. The chain drives indentation.
//! The state also remembers whether the last token was the `>` that pushed a
//! context, which is how a composite tokenizer learns an element was just opened.
//!
//! The html flavour folds tag names to lowercase and knows the html-specific
//! element rules: void elements never open a context, some elements close
//! implicitly, and some opening tags close an open sibling (`<li>` after `<li>`,
//! block elements after `<p>`).

use crate::mode::{HostMode, Indent, Mode};
use crate::options::ModeOptions;
use crate::stream::StringStream;
use crate::style::Style;
use once_cell::sync::Lazy;
use regex::Regex;

/// Leading tag of the text after the indentation: `(/)?` and the tag name.
static TAG_AFTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(/)?([\w:.\-]*)").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "frame", "hr", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr", "menuitem",
];

const IMPLICITLY_CLOSED: &[&str] = &[
    "dd", "li", "optgroup", "option", "p", "rp", "rt", "tbody", "td", "tfoot", "th", "tr",
];

/// Opening any of these closes an open `<p>`.
const P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dir", "div", "dl", "fieldset", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "menu", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

const DO_NOT_INDENT: &[&str] = &["pre"];

/// An open element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    tag_name: String,
    indent: usize,
    start_of_line: bool,
    no_indent: bool,
    prev: Option<Box<Context>>,
}

impl Context {
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Indentation of the line the element was opened on.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Whether the opening tag was the first thing on its line.
    pub fn start_of_line(&self) -> bool {
        self.start_of_line
    }

    /// The enclosing element.
    pub fn prev(&self) -> Option<&Context> {
        self.prev.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Comment,
    Cdata,
    Instruction,
}

impl Block {
    fn terminator(self) -> &'static str {
        match self {
            Block::Comment => "-->",
            Block::Cdata => "]]>",
            Block::Instruction => "?>",
        }
    }

    fn style(self) -> Style {
        match self {
            Block::Comment => Style::Comment,
            Block::Cdata => Style::Atom,
            Block::Instruction => Style::Meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tokenize {
    Text,
    Tag,
    Attribute(char),
    Block(Block),
    Doctype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Base,
    TagName,
    CloseTagName,
    Close,
    CloseErr,
    Attr,
    AttrEq,
    AttrValue,
    AttrContinued,
}

/// What the lexical layer saw, fed to the tag layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    OpenTag,
    CloseTag,
    EndTag,
    SelfCloseTag,
    Equals,
    Word,
    String,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlState {
    tokenize: Tokenize,
    phase: Phase,
    tag_name: Option<String>,
    tag_start: usize,
    indented: usize,
    base_indent: usize,
    string_start_col: usize,
    context: Option<Box<Context>>,
    /// Set by the `>` of an opening tag that pushed a context, cleared by the next token.
    opened: bool,
}

impl XmlState {
    /// Innermost open element.
    pub fn context(&self) -> Option<&Context> {
        self.context.as_deref()
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.context(), |ctx| ctx.prev()).count()
    }

    /// Name of the tag currently being parsed, while inside `<name ...`.
    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    fn push_context(&mut self, tag_name: String, start_of_line: bool, no_indent: bool) {
        let no_indent = no_indent || self.context.as_ref().is_some_and(|ctx| ctx.no_indent);
        let prev = self.context.take();
        self.context = Some(Box::new(Context {
            tag_name,
            indent: self.indented,
            start_of_line,
            no_indent,
            prev,
        }));
    }

    fn pop_context(&mut self) {
        if let Some(mut ctx) = self.context.take() {
            self.context = ctx.prev.take();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Html,
    Xml,
}

#[derive(Debug, Clone)]
pub struct XmlMode {
    flavor: Flavor,
    indent_unit: usize,
    multiline_tag_indent_factor: usize,
    multiline_tag_indent_past_tag: bool,
}

impl XmlMode {
    pub fn html(options: &ModeOptions) -> Self {
        Self::with_flavor(Flavor::Html, options)
    }

    pub fn xml(options: &ModeOptions) -> Self {
        Self::with_flavor(Flavor::Xml, options)
    }

    fn with_flavor(flavor: Flavor, options: &ModeOptions) -> Self {
        XmlMode {
            flavor,
            indent_unit: options.indent_unit,
            multiline_tag_indent_factor: options.multiline_tag_indent_factor,
            multiline_tag_indent_past_tag: options.multiline_tag_indent_past_tag,
        }
    }

    fn is_html(&self) -> bool {
        self.flavor == Flavor::Html
    }

    fn fold(&self, name: &str) -> String {
        if self.is_html() {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    fn auto_self_closes(&self, tag_name: &str) -> bool {
        self.is_html() && VOID_ELEMENTS.contains(&tag_name)
    }

    fn implicitly_closed(&self, tag_name: &str) -> bool {
        self.is_html() && IMPLICITLY_CLOSED.contains(&tag_name)
    }

    /// Whether opening `next` closes an open `parent`.
    fn grabs(&self, parent: &str, next: &str) -> bool {
        if !self.is_html() {
            return false;
        }
        match parent {
            "dd" | "dt" => matches!(next, "dd" | "dt"),
            "li" => next == "li",
            "option" => matches!(next, "option" | "optgroup"),
            "optgroup" => next == "optgroup",
            "p" => P_CLOSERS.contains(&next),
            "rp" | "rt" => matches!(next, "rp" | "rt"),
            "tbody" => matches!(next, "tbody" | "tfoot"),
            "td" | "th" => matches!(next, "td" | "th"),
            "tfoot" => next == "tbody",
            "thead" => matches!(next, "tbody" | "tfoot"),
            "tr" => next == "tr",
            _ => false,
        }
    }

    fn do_not_indent(&self, tag_name: &str) -> bool {
        self.is_html() && DO_NOT_INDENT.contains(&tag_name)
    }

    // ===== Lexical layer =====

    fn tokenize(&self, stream: &mut StringStream<'_>, state: &mut XmlState) -> (Option<Style>, Lexeme) {
        match state.tokenize {
            Tokenize::Text => self.in_text(stream, state),
            Tokenize::Tag => self.in_tag(stream, state),
            Tokenize::Attribute(quote) => in_attribute(stream, state, quote),
            Tokenize::Block(block) => in_block(stream, state, block),
            Tokenize::Doctype => in_doctype(stream, state),
        }
    }

    fn in_text(&self, stream: &mut StringStream<'_>, state: &mut XmlState) -> (Option<Style>, Lexeme) {
        let Some(ch) = stream.next() else {
            return (None, Lexeme::Other);
        };
        match ch {
            '<' => {
                if stream.eat('!').is_some() {
                    if stream.eat('[').is_some() {
                        if stream.match_str("CDATA[", true, false) {
                            return enter_block(stream, state, Block::Cdata);
                        }
                        return (None, Lexeme::Other);
                    }
                    if stream.match_str("--", true, false) {
                        return enter_block(stream, state, Block::Comment);
                    }
                    if stream.match_str("DOCTYPE", true, true) {
                        state.tokenize = Tokenize::Doctype;
                        return in_doctype(stream, state);
                    }
                    return (None, Lexeme::Other);
                }
                if stream.eat('?').is_some() {
                    return enter_block(stream, state, Block::Instruction);
                }
                let lexeme = if stream.eat('/').is_some() {
                    Lexeme::CloseTag
                } else {
                    Lexeme::OpenTag
                };
                state.tokenize = Tokenize::Tag;
                (Some(Style::Tag), lexeme)
            }
            '&' => {
                let ok = if stream.eat('#').is_some() {
                    if stream.eat('x').is_some() {
                        stream.eat_while(|c| c.is_ascii_hexdigit()) && stream.eat(';').is_some()
                    } else {
                        stream.eat_while(|c| c.is_ascii_digit()) && stream.eat(';').is_some()
                    }
                } else {
                    stream.eat_while(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
                        && stream.eat(';').is_some()
                };
                let style = if ok { Style::Atom } else { Style::Error };
                (Some(style), Lexeme::Other)
            }
            _ => {
                stream.eat_while(|c| c != '&' && c != '<');
                (None, Lexeme::Other)
            }
        }
    }

    fn in_tag(&self, stream: &mut StringStream<'_>, state: &mut XmlState) -> (Option<Style>, Lexeme) {
        let Some(ch) = stream.next() else {
            return (None, Lexeme::Other);
        };
        if ch == '>' || (ch == '/' && stream.eat('>').is_some()) {
            state.tokenize = Tokenize::Text;
            let lexeme = if ch == '>' {
                Lexeme::EndTag
            } else {
                Lexeme::SelfCloseTag
            };
            return (Some(Style::Tag), lexeme);
        }
        match ch {
            '=' => (None, Lexeme::Equals),
            '<' => {
                // A new tag inside an unfinished one: abandon the unfinished tag.
                state.tokenize = Tokenize::Text;
                state.phase = Phase::Base;
                state.tag_name = None;
                state.tag_start = 0;
                (Some(Style::Error), Lexeme::Other)
            }
            '"' | '\'' => {
                state.tokenize = Tokenize::Attribute(ch);
                state.string_start_col = stream.column();
                in_attribute(stream, state, ch)
            }
            _ => {
                stream.eat_while(|c| !c.is_whitespace() && !matches!(c, '=' | '<' | '>' | '"' | '\''));
                // A word never ends in '/', that belongs to a following "/>".
                while stream.current().len() > 1 && stream.current().ends_with('/') {
                    stream.back_up(1);
                }
                (None, Lexeme::Word)
            }
        }
    }

    // ===== Tag layer =====

    fn step(
        &self,
        phase: Phase,
        lexeme: Lexeme,
        stream: &StringStream<'_>,
        state: &mut XmlState,
        set_style: &mut Option<Option<Style>>,
    ) -> Phase {
        match phase {
            Phase::Base => match lexeme {
                Lexeme::OpenTag => {
                    state.tag_start = stream.column();
                    Phase::TagName
                }
                Lexeme::CloseTag => Phase::CloseTagName,
                _ => Phase::Base,
            },
            Phase::TagName => {
                if lexeme == Lexeme::Word {
                    state.tag_name = Some(self.fold(stream.current()));
                    *set_style = Some(Some(Style::Tag));
                    Phase::Attr
                } else {
                    *set_style = Some(Some(Style::Error));
                    Phase::TagName
                }
            }
            Phase::CloseTagName => {
                if lexeme != Lexeme::Word {
                    *set_style = Some(Some(Style::Error));
                    return Phase::CloseErr;
                }
                let tag_name = self.fold(stream.current());
                if let Some(ctx) = state.context() {
                    if ctx.tag_name != tag_name && self.implicitly_closed(&ctx.tag_name) {
                        state.pop_context();
                    }
                }
                if state.context().is_some_and(|ctx| ctx.tag_name == tag_name) {
                    *set_style = Some(Some(Style::Tag));
                    Phase::Close
                } else {
                    *set_style = Some(Some(Style::Error));
                    Phase::CloseErr
                }
            }
            Phase::Close => self.close(lexeme, state, set_style),
            Phase::CloseErr => {
                *set_style = Some(Some(Style::Error));
                self.close(lexeme, state, set_style)
            }
            Phase::Attr => self.attr(lexeme, state, set_style),
            Phase::AttrEq => {
                if lexeme == Lexeme::Equals {
                    return Phase::AttrValue;
                }
                if !self.is_html() {
                    *set_style = Some(Some(Style::Error));
                }
                self.attr(lexeme, state, set_style)
            }
            Phase::AttrValue => match lexeme {
                Lexeme::String => Phase::AttrContinued,
                Lexeme::Word if self.is_html() => {
                    *set_style = Some(Some(Style::String));
                    Phase::Attr
                }
                _ => {
                    *set_style = Some(Some(Style::Error));
                    self.attr(lexeme, state, set_style)
                }
            },
            Phase::AttrContinued => {
                if lexeme == Lexeme::String {
                    Phase::AttrContinued
                } else {
                    self.attr(lexeme, state, set_style)
                }
            }
        }
    }

    fn attr(&self, lexeme: Lexeme, state: &mut XmlState, set_style: &mut Option<Option<Style>>) -> Phase {
        match lexeme {
            Lexeme::Word => {
                *set_style = Some(Some(Style::Attribute));
                Phase::AttrEq
            }
            Lexeme::EndTag | Lexeme::SelfCloseTag => {
                let tag_name = state.tag_name.take().unwrap_or_default();
                let tag_start = std::mem::take(&mut state.tag_start);
                self.maybe_pop_context(state, &tag_name);
                if lexeme == Lexeme::EndTag && !self.auto_self_closes(&tag_name) {
                    let start_of_line = tag_start == state.indented;
                    let no_indent = self.do_not_indent(&tag_name);
                    state.push_context(tag_name, start_of_line, no_indent);
                    state.opened = true;
                }
                Phase::Base
            }
            _ => {
                *set_style = Some(Some(Style::Error));
                Phase::Attr
            }
        }
    }

    fn close(&self, lexeme: Lexeme, state: &mut XmlState, set_style: &mut Option<Option<Style>>) -> Phase {
        if lexeme != Lexeme::EndTag {
            *set_style = Some(Some(Style::Error));
            return Phase::Close;
        }
        state.pop_context();
        Phase::Base
    }

    fn maybe_pop_context(&self, state: &mut XmlState, next_tag: &str) {
        while let Some(parent) = state.context() {
            if !self.grabs(&parent.tag_name, next_tag) {
                return;
            }
            state.pop_context();
        }
    }
}

fn enter_block(stream: &mut StringStream<'_>, state: &mut XmlState, block: Block) -> (Option<Style>, Lexeme) {
    state.tokenize = Tokenize::Block(block);
    in_block(stream, state, block)
}

fn in_block(stream: &mut StringStream<'_>, state: &mut XmlState, block: Block) -> (Option<Style>, Lexeme) {
    while !stream.eol() {
        if stream.match_str(block.terminator(), true, false) {
            state.tokenize = Tokenize::Text;
            break;
        }
        stream.next();
    }
    (Some(block.style()), Lexeme::Other)
}

fn in_doctype(stream: &mut StringStream<'_>, state: &mut XmlState) -> (Option<Style>, Lexeme) {
    while let Some(ch) = stream.next() {
        if ch == '>' {
            state.tokenize = Tokenize::Text;
            break;
        }
    }
    (Some(Style::Meta), Lexeme::Other)
}

fn in_attribute(stream: &mut StringStream<'_>, state: &mut XmlState, quote: char) -> (Option<Style>, Lexeme) {
    while let Some(ch) = stream.next() {
        if ch == quote {
            state.tokenize = Tokenize::Tag;
            break;
        }
    }
    (Some(Style::String), Lexeme::String)
}

impl Default for XmlMode {
    fn default() -> Self {
        XmlMode::html(&ModeOptions::default())
    }
}

impl Mode for XmlMode {
    type State = XmlState;

    fn name(&self) -> &'static str {
        match self.flavor {
            Flavor::Html => "html",
            Flavor::Xml => "xml",
        }
    }

    fn start_state(&self, base_indent: usize) -> XmlState {
        XmlState {
            tokenize: Tokenize::Text,
            phase: Phase::Base,
            tag_name: None,
            tag_start: 0,
            indented: base_indent,
            base_indent,
            string_start_col: 0,
            context: None,
            opened: false,
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut XmlState) -> Option<Style> {
        state.opened = false;
        if state.tag_name.is_none() && stream.sol() {
            state.indented = stream.indentation();
        }
        if stream.eat_space() {
            return None;
        }
        let (style, lexeme) = self.tokenize(stream, state);
        if lexeme == Lexeme::Other {
            return style;
        }
        let mut set_style = None;
        let phase = state.phase;
        state.phase = self.step(phase, lexeme, stream, state, &mut set_style);
        set_style.unwrap_or(style)
    }

    fn indent(&self, state: &XmlState, text_after: &str) -> Indent {
        let text_after = text_after.trim_start();
        if let Tokenize::Attribute(_) = state.tokenize {
            return if state.tag_start == state.indented {
                Indent::Column(state.string_start_col + 1)
            } else {
                Indent::Column(state.indented + self.indent_unit)
            };
        }
        let mut context = state.context();
        if context.is_some_and(|ctx| ctx.no_indent) {
            return Indent::Pass;
        }
        if !matches!(state.tokenize, Tokenize::Text | Tokenize::Tag) {
            return Indent::Pass;
        }
        if let Some(tag_name) = &state.tag_name {
            return if self.multiline_tag_indent_past_tag {
                Indent::Column(state.tag_start + tag_name.len() + 2)
            } else {
                Indent::Column(state.tag_start + self.indent_unit * self.multiline_tag_indent_factor)
            };
        }
        if let Some(caps) = TAG_AFTER.captures(text_after) {
            let name = self.fold(caps.get(2).map_or("", |m| m.as_str()));
            if caps.get(1).is_some() {
                while let Some(ctx) = context {
                    if ctx.tag_name == name {
                        context = ctx.prev();
                        break;
                    } else if self.implicitly_closed(&ctx.tag_name) {
                        context = ctx.prev();
                    } else {
                        break;
                    }
                }
            } else {
                while let Some(ctx) = context {
                    if !self.grabs(&ctx.tag_name, &name) {
                        break;
                    }
                    context = ctx.prev();
                }
            }
        }
        while let Some(ctx) = context {
            if ctx.start_of_line {
                break;
            }
            context = ctx.prev();
        }
        match context {
            Some(ctx) => Indent::Column(ctx.indent + self.indent_unit),
            None => Indent::Column(state.base_indent),
        }
    }

    fn electric_chars(&self) -> &'static str {
        "/"
    }
}

impl HostMode for XmlMode {
    fn open_element<'s>(&self, state: &'s XmlState) -> Option<&'s str> {
        state.context().map(Context::tag_name)
    }

    fn opened_element<'s>(&self, state: &'s XmlState) -> Option<&'s str> {
        if state.opened {
            self.open_element(state)
        } else {
            None
        }
    }

    fn compare_states(&self, a: &XmlState, b: &XmlState) -> bool {
        if a.indented != b.indented || a.tokenize != b.tokenize {
            return false;
        }
        let (mut ca, mut cb) = (a.context(), b.context());
        loop {
            match (ca, cb) {
                (None, None) => return true,
                (Some(x), Some(y)) if x.tag_name == y.tag_name => {
                    ca = x.prev();
                    cb = y.prev();
                }
                _ => return false,
            }
        }
    }
}
