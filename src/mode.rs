//! Tokenizer contract
//!
//! A [Mode] tokenizes one line at a time through a [StringStream], carrying an
//! owned state from line to line. The state is opaque to everyone but the mode
//! that created it: callers store it, copy it through [Mode::copy_state] and hand
//! it back on the next call.
//!
//! Host grammars additionally implement [HostMode], which tells a composite which
//! element is open (and whether its opening tag just ended) and whether two
//! states are interchangeable.

use crate::stream::StringStream;
use crate::style::Style;

/// An indentation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Indent the line to this column.
    Column(usize),
    /// The mode has no opinion; the caller keeps the line as it is.
    Pass,
}

impl Indent {
    /// The column, or `fallback` when the mode passed.
    pub fn column_or(self, fallback: usize) -> usize {
        match self {
            Indent::Column(column) => column,
            Indent::Pass => fallback,
        }
    }
}

/// Outcome of comparing two line states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equivalence {
    Equivalent,
    Distinct,
    /// The states cannot be compared without re-tokenizing.
    Indeterminate,
}

impl From<bool> for Equivalence {
    fn from(equal: bool) -> Self {
        if equal {
            Equivalence::Equivalent
        } else {
            Equivalence::Distinct
        }
    }
}

/// A line-oriented tokenizer.
pub trait Mode {
    type State: Clone;

    /// Name the mode is registered under.
    fn name(&self) -> &'static str;

    /// State for the first line. `base_indent` is the column that unindented content
    /// of this grammar should sit at (non-zero when embedded in another grammar).
    fn start_state(&self, base_indent: usize) -> Self::State;

    /// Consume one token from `stream` and return its style.
    ///
    /// Must consume at least one character when the stream is not at end of line.
    fn token(&self, stream: &mut StringStream<'_>, state: &mut Self::State) -> Option<Style>;

    /// Independent copy of `state`.
    fn copy_state(&self, state: &Self::State) -> Self::State {
        state.clone()
    }

    /// Indentation for a line starting with `text_after`, given the state at its start.
    fn indent(&self, _state: &Self::State, _text_after: &str) -> Indent {
        Indent::Pass
    }

    /// Characters that trigger re-indentation when typed.
    fn electric_chars(&self) -> &'static str {
        ""
    }

    /// Name of the grammar that produced the most recent token.
    fn token_grammar(&self, _state: &Self::State) -> &'static str {
        self.name()
    }
}

/// A mode that can host embedded grammars.
pub trait HostMode: Mode {
    /// Name of the innermost open element, if any.
    fn open_element<'s>(&self, state: &'s Self::State) -> Option<&'s str>;

    /// Element whose opening tag was closed by the token just produced, if any.
    fn opened_element<'s>(&self, state: &'s Self::State) -> Option<&'s str>;

    /// Whether tokenizing from either state would give the same result.
    fn compare_states(&self, a: &Self::State, b: &Self::State) -> bool;
}
