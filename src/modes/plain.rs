//! Plain text: one unstyled token per line.

use crate::mode::Mode;
use crate::stream::StringStream;
use crate::style::Style;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextMode;

impl Mode for PlainTextMode {
    type State = ();

    fn name(&self) -> &'static str {
        "text"
    }

    fn start_state(&self, _base_indent: usize) -> Self::State {}

    fn token(&self, stream: &mut StringStream<'_>, _state: &mut Self::State) -> Option<Style> {
        stream.skip_to_end();
        None
    }
}
