//! Mode registry
//!
//! Holds the available modes by name and maps MIME types onto them, so callers
//! can pick a tokenizer at runtime (the CLI's `--mime`, for instance).
//! Nothing is registered implicitly: [ModeRegistry::with_defaults] is the
//! startup call that installs the composite and its sub-modes.

use crate::error::ModeError;
use crate::html_mixed::HtmlMixedMode;
use crate::modes::{CssMode, JavaScriptMode, PlainTextMode, XmlMode};
use crate::options::ModeOptions;
use crate::runmode::{Highlighter, StyledSpan};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for mode implementations
#[derive(Clone, Default)]
pub struct ModeRegistry {
    modes: HashMap<String, Arc<dyn Highlighter>>,
    mimes: HashMap<String, String>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        ModeRegistry {
            modes: HashMap::new(),
            mimes: HashMap::new(),
        }
    }

    /// Registry with the composite and every reference mode, configured by `options`.
    pub fn with_defaults(options: &ModeOptions) -> Result<Self, ModeError> {
        let mut registry = ModeRegistry::new();
        registry.register(Arc::new(HtmlMixedMode::from_options(options)?));
        registry.register(Arc::new(XmlMode::html(options)));
        registry.register(Arc::new(XmlMode::xml(options)));
        registry.register(Arc::new(JavaScriptMode::new(options)));
        registry.register(Arc::new(CssMode::new(options)));
        registry.register(Arc::new(PlainTextMode));

        registry.define_mime("text/html", "htmlmixed");
        registry.define_mime("application/xml", "xml");
        registry.define_mime("text/xml", "xml");
        registry.define_mime("text/javascript", "javascript");
        registry.define_mime("application/javascript", "javascript");
        registry.define_mime("text/css", "css");
        registry.define_mime("text/plain", "text");
        Ok(registry)
    }

    /// Register a mode under its own name, replacing any previous one.
    pub fn register(&mut self, mode: Arc<dyn Highlighter>) {
        tracing::debug!(target: "htmlmixed", mode = mode.mode_name(), "registered mode");
        self.modes.insert(mode.mode_name().to_string(), mode);
    }

    /// Bind a MIME type to a mode name.
    pub fn define_mime(&mut self, mime: &str, mode: &str) {
        tracing::debug!(target: "htmlmixed", mime, mode, "defined MIME type");
        self.mimes.insert(mime.to_string(), mode.to_string());
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Highlighter>> {
        self.modes.get(name).cloned()
    }

    /// Mode bound to `mime`. MIME types compare case-insensitively.
    pub fn get_by_mime(&self, mime: &str) -> Option<Arc<dyn Highlighter>> {
        let name = self.mimes.get(&mime.to_ascii_lowercase())?;
        self.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.modes.contains_key(name)
    }

    /// Registered mode names, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<_> = self.modes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered MIME types with their mode names, sorted by MIME type.
    pub fn mime_types(&self) -> Vec<(String, String)> {
        let mut mimes: Vec<_> = self
            .mimes
            .iter()
            .map(|(mime, mode)| (mime.clone(), mode.clone()))
            .collect();
        mimes.sort();
        mimes
    }

    pub fn highlight(&self, name: &str, source: &str) -> Result<Vec<StyledSpan>, ModeError> {
        let mode = self
            .get(name)
            .ok_or_else(|| ModeError::UnknownMode(name.to_string()))?;
        mode.highlight(source)
    }

    pub fn highlight_mime(&self, mime: &str, source: &str) -> Result<Vec<StyledSpan>, ModeError> {
        let mode = self
            .get_by_mime(mime)
            .ok_or_else(|| ModeError::UnknownMime(mime.to_string()))?;
        mode.highlight(source)
    }
}
