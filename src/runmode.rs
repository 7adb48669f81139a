//! Line driver
//!
//! Runs a mode over a whole document the way an editor would: one
//! [StringStream] per line, one state carried across lines, `token` called until
//! the line is consumed. Each call must advance the stream; a mode that does
//! not is reported instead of looping forever.

use crate::error::ModeError;
use crate::mode::Mode;
use crate::stream::StringStream;
use crate::style::Style;
use serde::Serialize;

/// One token of a highlighted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    /// Zero-based line number.
    pub line: usize,
    /// Byte range within the line.
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub style: Option<Style>,
    /// Grammar that produced the span.
    pub mode: &'static str,
}

/// Tokenize every line of `source`.
pub fn run_mode<M: Mode>(mode: &M, source: &str) -> Result<Vec<StyledSpan>, ModeError> {
    let mut state = mode.start_state(0);
    let mut spans = Vec::new();
    for (index, line) in source.lines().enumerate() {
        tokenize_line(mode, &mut state, index, line, &mut spans)?;
    }
    Ok(spans)
}

/// Tokenize one line, appending its spans to `spans`.
pub fn tokenize_line<M: Mode>(
    mode: &M,
    state: &mut M::State,
    index: usize,
    line: &str,
    spans: &mut Vec<StyledSpan>,
) -> Result<(), ModeError> {
    let mut stream = StringStream::new(line);
    while !stream.eol() {
        stream.start_token();
        let style = mode.token(&mut stream, state);
        if stream.pos() <= stream.start() {
            return Err(ModeError::NoProgress {
                line: index + 1,
                column: stream.start() + 1,
                mode: mode.token_grammar(state),
            });
        }
        spans.push(StyledSpan {
            line: index,
            start: stream.start(),
            end: stream.pos(),
            text: stream.current().to_string(),
            style,
            mode: mode.token_grammar(state),
        });
    }
    Ok(())
}

/// Object-safe view of a mode, for storing heterogeneous modes together.
pub trait Highlighter: Send + Sync {
    fn mode_name(&self) -> &'static str;

    fn highlight(&self, source: &str) -> Result<Vec<StyledSpan>, ModeError>;
}

impl<M: Mode + Send + Sync> Highlighter for M {
    fn mode_name(&self) -> &'static str {
        self.name()
    }

    fn highlight(&self, source: &str) -> Result<Vec<StyledSpan>, ModeError> {
        run_mode(self, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{JavaScriptMode, PlainTextMode};

    struct Stuck;

    impl Mode for Stuck {
        type State = ();

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn start_state(&self, _base_indent: usize) -> Self::State {}

        fn token(&self, _stream: &mut StringStream<'_>, _state: &mut ()) -> Option<Style> {
            None
        }
    }

    #[test]
    fn test_spans_cover_lines() {
        let spans = run_mode(&JavaScriptMode::default(), "a = 1;\n\nb").unwrap();
        let first_line: String = spans
            .iter()
            .filter(|span| span.line == 0)
            .map(|span| span.text.as_str())
            .collect();
        assert_eq!(first_line, "a = 1;");
        let last = spans.last().unwrap();
        assert_eq!((last.line, last.start, last.end), (2, 0, 1));
        assert_eq!(last.mode, "javascript");
    }

    #[test]
    fn test_no_progress_is_reported() {
        let err = run_mode(&Stuck, "\nx").unwrap_err();
        assert_eq!(
            err,
            ModeError::NoProgress {
                line: 2,
                column: 1,
                mode: "stuck"
            }
        );
    }

    #[test]
    fn test_highlighter_is_object_safe() {
        let highlighter: Box<dyn Highlighter> = Box::new(PlainTextMode);
        assert_eq!(highlighter.mode_name(), "text");
        assert_eq!(highlighter.highlight("one\ntwo").unwrap().len(), 2);
    }
}
