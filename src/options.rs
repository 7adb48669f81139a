//! Tuning knobs shared by the reference modes and the composite.
//!
//! The `htmlmixed-config` crate loads these from TOML; library users can also
//! build them directly.

/// Script `type` values that select the javascript grammar.
pub const DEFAULT_JAVASCRIPT_TYPES: &str = r"(text|application)/(java|ecma)script";

/// Script `type` values whose body stays in the host grammar.
pub const DEFAULT_TEMPLATE_TYPES: &[&str] = &[r"/x-handlebars-template", r"/x-mustache"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeOptions {
    /// Columns added per nesting level.
    pub indent_unit: usize,
    /// Continuation lines of a multi-line tag indent by this many units past the tag start.
    pub multiline_tag_indent_factor: usize,
    /// Align continuation lines of a multi-line tag just past the tag name instead.
    pub multiline_tag_indent_past_tag: bool,
    /// Case-insensitive pattern for javascript script types.
    pub javascript_types: String,
    /// Case-insensitive patterns for template script types.
    pub template_types: Vec<String>,
}

impl Default for ModeOptions {
    fn default() -> Self {
        ModeOptions {
            indent_unit: 2,
            multiline_tag_indent_factor: 1,
            multiline_tag_indent_past_tag: true,
            javascript_types: DEFAULT_JAVASCRIPT_TYPES.to_string(),
            template_types: DEFAULT_TEMPLATE_TYPES
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
        }
    }
}
