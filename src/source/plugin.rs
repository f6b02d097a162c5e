use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::{FetchMode, SourceKind};
use crate::error::{Result, SourceError};

/// Options record for a plugin-provided source.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginOptions {
    #[serde(rename = "type")]
    pub plugin: String,
    /// Free-form settings for the plugin; any TOML value.
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

impl PluginOptions {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// A source whose fetch behavior belongs to a plugin.
/// Equality is structural over the plugin type and its options.
#[derive(Clone, Debug)]
pub struct PluginSource {
    plugin: String,
    options: BTreeMap<String, toml::Value>,
    pub(super) mode: FetchMode,
}

impl PluginSource {
    pub fn new(options: PluginOptions) -> Result<Self> {
        if options.plugin.trim().is_empty() {
            return Err(SourceError::invalid_options(SourceKind::Plugin, "missing `type`"));
        }
        Ok(Self {
            plugin: options.plugin,
            options: options.options,
            mode: FetchMode::default(),
        })
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn options(&self) -> &BTreeMap<String, toml::Value> {
        &self.options
    }
}

impl PartialEq for PluginSource {
    fn eq(&self, other: &Self) -> bool {
        self.plugin == other.plugin && self.options == other.options
    }
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin source {}", self.plugin)?;
        if !self.options.is_empty() {
            let options: Vec<String> = self
                .options
                .iter()
                .map(|(key, value)| match value {
                    toml::Value::String(text) => format!("{}={}", key, text),
                    other => format!("{}={}", key, other),
                })
                .collect();
            write!(f, " ({})", options.join(", "))?;
        }
        Ok(())
    }
}
