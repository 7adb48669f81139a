//! # htmlmixed
//!
//! A composite tokenizer for HTML documents that embed JavaScript and CSS.
//!
//! The host grammar is HTML. Bodies of `<script>` and `<style>` elements are handed to
//! their own tokenizers, and the composite switches between them at the right offsets,
//! producing one stream of styled spans and indentation decisions for the whole document.
//!
//! Layout:
//!
//! - [stream]: the per-line cursor every tokenizer reads from.
//! - [mode]: the tokenizer contract ([mode::Mode], [mode::HostMode]).
//! - [html_mixed]: the composite state machine, boundary recovery and script type dispatch.
//! - [modes]: the reference html/xml, javascript, css and plain text tokenizers.
//! - [runmode]: drives a mode over a document and collects [runmode::StyledSpan]s.
//! - [registry]: name and MIME lookup, populated by an explicit registration call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use htmlmixed::html_mixed::HtmlMixedMode;
//! use htmlmixed::runmode::run_mode;
//!
//! let mode = HtmlMixedMode::default();
//! let spans = run_mode(&mode, "<script>var x = 1;</script>").unwrap();
//! ```

pub mod error;
pub mod html_mixed;
pub mod mode;
pub mod modes;
pub mod options;
pub mod registry;
pub mod runmode;
pub mod stream;
pub mod style;

pub use error::ModeError;
pub use html_mixed::{Grammar, HtmlMixed, HtmlMixedMode, MixedState};
pub use mode::{Equivalence, HostMode, Indent, Mode};
pub use options::ModeOptions;
pub use registry::ModeRegistry;
pub use runmode::{run_mode, StyledSpan};
pub use stream::StringStream;
pub use style::Style;
