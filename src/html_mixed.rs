//! Composite html tokenizer
//!
//! [HtmlMixed] tokenizes html with a host mode and hands the bodies of
//! `<script>` and `<style>` elements to embedded modes. The state it carries
//! from line to line ([MixedState]) holds the host state at all times, plus
//! the state of the embedded mode while inside a region.
//!
//! Switching grammars happens on token boundaries only:
//!
//!     Entry: the host just produced the `>` of an opening tag that pushed
//!     `script` or `style` (see [HostMode::opened_element]). Closing tags and
//!     void elements inside a template body never qualify. Script bodies are dispatched on
//!     the `type` attribute found on the same line (see [script_type]).
//!
//!     Exit: before each embedded token, if the cursor sits on the region's
//!     closing tag, the embedded state is dropped and the same call goes to
//!     the host. Embedded tokens are cut short of the closing tag by
//!     [boundary::guard], so the cursor always lands on it.
//!
//! The sub-modes are generic parameters. [HtmlMixedMode] binds the reference
//! modes from [crate::modes].

pub mod boundary;
pub mod script_type;

use crate::error::ModeError;
use crate::mode::{Equivalence, HostMode, Indent, Mode};
use crate::modes::{CssMode, JavaScriptMode, PlainTextMode, XmlMode};
use crate::options::ModeOptions;
use crate::stream::StringStream;
use crate::style::Style;
use boundary::{ClosingTag, SCRIPT_CLOSE, STYLE_CLOSE};
use once_cell::sync::Lazy;
use regex::Regex;
use script_type::{ScriptKind, ScriptTypes};

/// Indentation inside a script body of unknown type.
pub const NEUTRAL_INDENT: Indent = Indent::Column(0);

/// A line starting with a closing tag is indented by the host.
static CLOSING_TAG_AHEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*</").unwrap());

/// Which grammar governs tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Host,
    Script,
    Style,
    UnknownScript,
}

/// State of the embedded region being tokenized.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded<S, C> {
    Script(S),
    Style(C),
    /// Script of unknown type. The fallback mode keeps no state across tokens.
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixedState<H, S, C> {
    host: H,
    embedded: Option<Embedded<S, C>>,
    last: Grammar,
}

impl<H, S, C> MixedState<H, S, C> {
    pub fn active_grammar(&self) -> Grammar {
        match &self.embedded {
            None => Grammar::Host,
            Some(Embedded::Script(_)) => Grammar::Script,
            Some(Embedded::Style(_)) => Grammar::Style,
            Some(Embedded::Unknown) => Grammar::UnknownScript,
        }
    }

    pub fn host_state(&self) -> &H {
        &self.host
    }

    pub fn embedded_state(&self) -> Option<&Embedded<S, C>> {
        self.embedded.as_ref()
    }

    /// Grammar that produced the most recent token.
    pub fn last_grammar(&self) -> Grammar {
        self.last
    }
}

/// The mode governing tokenization, with its state when it has one.
pub enum InnerMode<'a, H: Mode, J: Mode, C: Mode, F: Mode> {
    Host(&'a H, &'a H::State),
    Script(&'a J, &'a J::State),
    Style(&'a C, &'a C::State),
    Fallback(&'a F),
}

impl<H: Mode, J: Mode, C: Mode, F: Mode> InnerMode<'_, H, J, C, F> {
    pub fn name(&self) -> &'static str {
        match self {
            InnerMode::Host(mode, _) => mode.name(),
            InnerMode::Script(mode, _) => mode.name(),
            InnerMode::Style(mode, _) => mode.name(),
            InnerMode::Fallback(mode) => mode.name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlMixed<H, J, C, F> {
    html: H,
    javascript: J,
    css: C,
    fallback: F,
    script_types: ScriptTypes,
}

/// The composite over the reference modes, registered as `htmlmixed`.
pub type HtmlMixedMode = HtmlMixed<XmlMode, JavaScriptMode, CssMode, PlainTextMode>;

type StateOf<H, J, C> = MixedState<<H as Mode>::State, <J as Mode>::State, <C as Mode>::State>;

impl<H: HostMode, J: Mode, C: Mode, F: Mode> HtmlMixed<H, J, C, F> {
    pub fn new(html: H, javascript: J, css: C, fallback: F) -> Self {
        HtmlMixed {
            html,
            javascript,
            css,
            fallback,
            script_types: ScriptTypes::default(),
        }
    }

    pub fn with_script_types(mut self, script_types: ScriptTypes) -> Self {
        self.script_types = script_types;
        self
    }

    /// Whether tokenizing from either state would give the same result.
    pub fn compare_states(&self, a: &StateOf<H, J, C>, b: &StateOf<H, J, C>) -> Equivalence {
        if a.active_grammar() != b.active_grammar() {
            return Equivalence::Distinct;
        }
        match a.embedded {
            Some(Embedded::Script(_)) | Some(Embedded::Style(_)) => Equivalence::Indeterminate,
            Some(Embedded::Unknown) | None => self.html.compare_states(&a.host, &b.host).into(),
        }
    }

    pub fn inner_mode<'a>(&'a self, state: &'a StateOf<H, J, C>) -> InnerMode<'a, H, J, C, F> {
        match &state.embedded {
            None => InnerMode::Host(&self.html, &state.host),
            Some(Embedded::Script(js)) => InnerMode::Script(&self.javascript, js),
            Some(Embedded::Style(css)) => InnerMode::Style(&self.css, css),
            Some(Embedded::Unknown) => InnerMode::Fallback(&self.fallback),
        }
    }

    fn host_token(&self, stream: &mut StringStream<'_>, state: &mut StateOf<H, J, C>) -> Option<Style> {
        state.last = Grammar::Host;
        let style = self.html.token(stream, &mut state.host);
        let Some(element) = self.html.opened_element(&state.host) else {
            return style;
        };

        if element.eq_ignore_ascii_case("script") {
            match self.script_types.classify(stream.string()) {
                ScriptKind::JavaScript => {
                    let base = self.seed_indent(&state.host);
                    state.embedded = Some(Embedded::Script(self.javascript.start_state(base)));
                }
                ScriptKind::Template => {
                    tracing::trace!(
                        target: "htmlmixed",
                        script_type = ?ScriptTypes::declared_type(stream.string()),
                        "template script stays in host"
                    );
                }
                ScriptKind::Unknown => state.embedded = Some(Embedded::Unknown),
            }
        } else if element.eq_ignore_ascii_case("style") {
            let base = self.seed_indent(&state.host);
            state.embedded = Some(Embedded::Style(self.css.start_state(base)));
        }

        if state.embedded.is_some() {
            tracing::trace!(
                target: "htmlmixed",
                grammar = ?state.active_grammar(),
                column = stream.pos(),
                "entering embedded region"
            );
        }
        style
    }

    fn seed_indent(&self, host: &H::State) -> usize {
        self.html.indent(host, "").column_or(0)
    }
}

impl HtmlMixedMode {
    pub fn from_options(options: &ModeOptions) -> Result<Self, ModeError> {
        Ok(HtmlMixed::new(
            XmlMode::html(options),
            JavaScriptMode::new(options),
            CssMode::new(options),
            PlainTextMode,
        )
        .with_script_types(ScriptTypes::from_options(options)?))
    }
}

impl Default for HtmlMixedMode {
    fn default() -> Self {
        HtmlMixed::new(
            XmlMode::default(),
            JavaScriptMode::default(),
            CssMode::default(),
            PlainTextMode,
        )
    }
}

impl<H: HostMode, J: Mode, C: Mode, F: Mode> Mode for HtmlMixed<H, J, C, F> {
    type State = StateOf<H, J, C>;

    fn name(&self) -> &'static str {
        "htmlmixed"
    }

    fn start_state(&self, base_indent: usize) -> Self::State {
        MixedState {
            host: self.html.start_state(base_indent),
            embedded: None,
            last: Grammar::Host,
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut Self::State) -> Option<Style> {
        let closing: &ClosingTag = match &state.embedded {
            None => return self.host_token(stream, state),
            Some(Embedded::Style(_)) => &*STYLE_CLOSE,
            Some(Embedded::Script(_)) | Some(Embedded::Unknown) => &*SCRIPT_CLOSE,
        };

        if closing.matches_at(stream) {
            tracing::trace!(
                target: "htmlmixed",
                grammar = ?state.active_grammar(),
                element = closing.element(),
                column = stream.pos(),
                "leaving embedded region"
            );
            state.embedded = None;
            return self.host_token(stream, state);
        }

        let (grammar, style) = match state.embedded.as_mut() {
            Some(Embedded::Script(js)) => (Grammar::Script, self.javascript.token(stream, js)),
            Some(Embedded::Style(css)) => (Grammar::Style, self.css.token(stream, css)),
            Some(Embedded::Unknown) => {
                let mut scratch = self.fallback.start_state(0);
                (Grammar::UnknownScript, self.fallback.token(stream, &mut scratch))
            }
            None => return self.host_token(stream, state),
        };
        state.last = grammar;
        boundary::guard(stream, closing, style)
    }

    fn copy_state(&self, state: &Self::State) -> Self::State {
        let embedded = state.embedded.as_ref().map(|embedded| match embedded {
            Embedded::Script(js) => Embedded::Script(self.javascript.copy_state(js)),
            Embedded::Style(css) => Embedded::Style(self.css.copy_state(css)),
            Embedded::Unknown => Embedded::Unknown,
        });
        MixedState {
            host: self.html.copy_state(&state.host),
            embedded,
            last: state.last,
        }
    }

    fn indent(&self, state: &Self::State, text_after: &str) -> Indent {
        match &state.embedded {
            None => self.html.indent(&state.host, text_after),
            Some(_) if CLOSING_TAG_AHEAD.is_match(text_after) => self.html.indent(&state.host, text_after),
            Some(Embedded::Script(js)) => self.javascript.indent(js, text_after),
            Some(Embedded::Style(css)) => self.css.indent(css, text_after),
            Some(Embedded::Unknown) => NEUTRAL_INDENT,
        }
    }

    fn electric_chars(&self) -> &'static str {
        "/{}:"
    }

    fn token_grammar(&self, state: &Self::State) -> &'static str {
        match state.last {
            Grammar::Host => self.html.name(),
            Grammar::Script => self.javascript.name(),
            Grammar::Style => self.css.name(),
            Grammar::UnknownScript => self.fallback.name(),
        }
    }
}
