//! Configuration surface for the source layer.
//!
//! Settings come from a TOML file, then environment overrides:
//!
//! ```text
//! [git]
//! allow_insecure = false   # PKGSOURCE_GIT__ALLOW_INSECURE
//! [lock]
//! multisource = false      # PKGSOURCE_LOCK__MULTISOURCE
//! ```
//!
//! Keys are addressed as `section.name` through [`Settings::flag`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SourceError};

/// Prefix of environment overrides. `__` separates section from key.
pub const ENV_PREFIX: &str = "PKGSOURCE_";

/// Settings file used when `$PKGSOURCE_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "pkgsource.config.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub git: GitSettings,
    pub lock: LockSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Suppress the warning for `git://` sources.
    pub allow_insecure: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSettings {
    /// The lock format carries one merged registry section.
    pub multisource: bool,
}

impl Settings {
    /// Parse settings from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Settings, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path).map_err(|error| SourceError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Settings::parse(&content).map_err(|error| SourceError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Resolve the settings file path.
    ///
    /// Priority:
    /// 1. `$PKGSOURCE_CONFIG`
    /// 2. `./pkgsource.config.toml`
    pub fn config_path() -> PathBuf {
        std::env::var("PKGSOURCE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Layer the process environment on top of these settings.
    pub fn with_env(self) -> Settings {
        self.with_overrides(std::env::vars())
    }

    /// Layer `PKGSOURCE_SECTION__KEY=value` pairs on top of these settings.
    /// Unknown keys and non-boolean values are ignored.
    pub fn with_overrides<I>(mut self, vars: I) -> Settings
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase().replace("__", ".");
            if let Some(value) = parse_bool(&value) {
                self.set_flag(&key, value);
            }
        }
        self
    }

    /// Structured lookup of a boolean setting, e.g. `"git.allow_insecure"`.
    /// Unknown keys read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        match key {
            "git.allow_insecure" => self.git.allow_insecure,
            "lock.multisource" => self.lock.multisource,
            _ => false,
        }
    }

    /// Set a boolean setting. Returns `false` for unknown keys.
    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        match key {
            "git.allow_insecure" => self.git.allow_insecure = value,
            "lock.multisource" => self.lock.multisource = value,
            _ => return false,
        }
        true
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
