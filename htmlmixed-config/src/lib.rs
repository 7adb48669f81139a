//! Configuration loader for the htmlmixed tokenizer.
//!
//! `defaults/htmlmixed.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`HtmlMixedConfig`], then turn it into the library's [`ModeOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use htmlmixed::ModeOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/htmlmixed.default.toml");

/// Top-level configuration consumed by htmlmixed applications.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlMixedConfig {
    pub indent: IndentConfig,
    pub script: ScriptConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndentConfig {
    pub unit: usize,
    pub multiline_tag_factor: usize,
    pub multiline_tag_past_tag: bool,
}

/// Script `type` patterns.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptConfig {
    pub javascript_types: String,
    pub template_types: Vec<String>,
}

impl HtmlMixedConfig {
    pub fn mode_options(&self) -> ModeOptions {
        ModeOptions {
            indent_unit: self.indent.unit,
            multiline_tag_indent_factor: self.indent.multiline_tag_factor,
            multiline_tag_indent_past_tag: self.indent.multiline_tag_past_tag,
            javascript_types: self.script.javascript_types.clone(),
            template_types: self.script.template_types.clone(),
        }
    }
}

/// Builds an [`HtmlMixedConfig`] from the embedded defaults plus any number of
/// TOML layers. Later layers win key by key, so a user file only needs the keys
/// it changes (for example `script.javascript_types`).
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, e.g. a per-project `htmlmixed.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Override the indentation unit, as the CLI's `--indent-unit` does.
    pub fn with_indent_unit(self, unit: usize) -> Result<Self, ConfigError> {
        let unit = i64::try_from(unit)
            .map_err(|_| ConfigError::Message(format!("indent unit {} is too large", unit)))?;
        self.set_override("indent.unit", unit)
    }

    /// Override a single dotted key such as `script.javascript_types`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer and deserialize. Script patterns are compiled later, by
    /// [`htmlmixed::ModeRegistry::with_defaults`].
    pub fn build(self) -> Result<HtmlMixedConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<HtmlMixedConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.indent.unit, 2);
        assert!(config.indent.multiline_tag_past_tag);
        assert_eq!(config.mode_options(), ModeOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("indent.unit", 4_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.mode_options().indent_unit, 4);
    }

    #[test]
    fn layers_user_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("user.toml");
        let mut file = std::fs::File::create(&path).expect("config file");
        writeln!(file, "[script]\njavascript_types = \"text/babel\"").expect("write config");
        drop(file);

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.script.javascript_types, "text/babel");
        assert_eq!(config.script.template_types.len(), 2);
        assert_eq!(config.indent.unit, 2);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/htmlmixed.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn indent_unit_override_reaches_mode_options() {
        let config = Loader::new()
            .with_indent_unit(4)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.mode_options().indent_unit, 4);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/htmlmixed.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.indent.unit, 2);
    }
}
