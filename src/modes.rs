//! Reference tokenizers
//!
//! These are the sub-modes the default composite binds: an html/xml host, a
//! javascript mode, a css mode and a plain text fallback. Each one is usable on
//! its own and registered under its own name (see [crate::registry]).
//!
//! The javascript and css modes recognise lexemes with logos on the remainder of
//! the line, then layer the state that logos cannot express (comments and
//! template literals spanning lines, bracket nesting for indentation) on top.

pub mod css;
pub mod javascript;
pub mod plain;
pub mod xml;

pub use css::{CssMode, CssState};
pub use javascript::{JavaScriptMode, JsState};
pub use plain::PlainTextMode;
pub use xml::{Context, XmlMode, XmlState};
