//! Shared helpers for the integration tests.

#![allow(dead_code)]

use htmlmixed::{Mode, StringStream, Style, StyledSpan};

/// Consumes a fixed number of characters per token, whatever they are.
///
/// Standing in for the javascript mode, it tears closing tags apart at every
/// possible offset.
#[derive(Debug, Clone, Copy)]
pub struct ChunkedMode(pub usize);

impl Mode for ChunkedMode {
    type State = ();

    fn name(&self) -> &'static str {
        "chunked"
    }

    fn start_state(&self, _base_indent: usize) -> Self::State {}

    fn token(&self, stream: &mut StringStream<'_>, _state: &mut Self::State) -> Option<Style> {
        for _ in 0..self.0.max(1) {
            if stream.next().is_none() {
                break;
            }
        }
        Some(Style::Variable)
    }
}

/// One span per line: `mode style "text"`.
pub fn render(spans: &[StyledSpan]) -> String {
    spans
        .iter()
        .map(|span| {
            format!(
                "{} {} {:?}",
                span.mode,
                span.style.map_or("-", |style| style.as_str()),
                span.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenated text of the spans produced by `mode`.
pub fn text_of(spans: &[StyledSpan], mode: &str) -> String {
    spans
        .iter()
        .filter(|span| span.mode == mode)
        .map(|span| span.text.as_str())
        .collect()
}
