//! Choosing the grammar of a `<script>` body from its `type` attribute.

use crate::error::ModeError;
use crate::options::{ModeOptions, DEFAULT_JAVASCRIPT_TYPES, DEFAULT_TEMPLATE_TYPES};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// First `type="..."` on the line. Greedy, so a later quote on the same line ends the value.
static TYPE_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)type\s*=\s*["'](.+)["']"#).unwrap());

static DEFAULT_SCRIPT_TYPES: Lazy<ScriptTypes> = Lazy::new(|| {
    let templates: Vec<String> = DEFAULT_TEMPLATE_TYPES.iter().map(|t| t.to_string()).collect();
    ScriptTypes::new(DEFAULT_JAVASCRIPT_TYPES, &templates).unwrap()
});

/// How a script body is tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    JavaScript,
    /// Template markup: the body stays in the host grammar.
    Template,
    /// Anything else: the body is handed to the fallback tokenizer.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct ScriptTypes {
    javascript: Regex,
    templates: Vec<Regex>,
}

impl ScriptTypes {
    /// Compile the patterns case-insensitively.
    pub fn new(javascript: &str, templates: &[String]) -> Result<Self, ModeError> {
        Ok(ScriptTypes {
            javascript: compile(javascript)?,
            templates: templates
                .iter()
                .map(|pattern| compile(pattern))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn from_options(options: &ModeOptions) -> Result<Self, ModeError> {
        Self::new(&options.javascript_types, &options.template_types)
    }

    /// Value of the first `type` attribute found anywhere on `line`.
    pub fn declared_type(line: &str) -> Option<&str> {
        TYPE_ATTRIBUTE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn classify_type(&self, declared: Option<&str>) -> ScriptKind {
        let Some(declared) = declared else {
            return ScriptKind::JavaScript;
        };
        if self.javascript.is_match(declared) {
            ScriptKind::JavaScript
        } else if self.templates.iter().any(|re| re.is_match(declared)) {
            ScriptKind::Template
        } else {
            ScriptKind::Unknown
        }
    }

    /// Classify the script whose opening tag ends on `line`.
    pub fn classify(&self, line: &str) -> ScriptKind {
        self.classify_type(Self::declared_type(line))
    }
}

impl Default for ScriptTypes {
    fn default() -> Self {
        DEFAULT_SCRIPT_TYPES.clone()
    }
}

fn compile(pattern: &str) -> Result<Regex, ModeError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| ModeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}
