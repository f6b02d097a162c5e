//! Source manifest and lockfile.
//!
//! The manifest (`sources.toml`) declares where packages may come from; the
//! lockfile (`sources.lock`) persists the lock view of those declarations.
//!
//! Manifest forms:
//! ```text
//! source = "https://packages.example.org"   # default aggregate registry
//! remotes = ["https://mirror.example.org"]  # extra aggregate remotes
//!
//! [[path]]      path = "vendor/lib", global = true
//! [[git]]       uri = "https://example.com/x.git", branch = "main"
//! [[registry]]  remotes = ["https://private.example.org"]
//! [[plugin]]    type = "s3", options = { bucket = "pkgs" }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::{GitOptions, PathOptions, PluginOptions, RegistryOptions};

// ─── Data Types ────────────────────────────────────────────────────

/// Parsed source declarations.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Single remote assigned to the default aggregate registry.
    pub source: Option<String>,
    /// Remotes appended to the default aggregate registry.
    pub remotes: Vec<String>,
    pub path: Vec<PathOptions>,
    pub git: Vec<GitOptions>,
    pub registry: Vec<RegistryOptions>,
    pub plugin: Vec<PluginOptions>,
}

/// One persisted source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LockedSource {
    Path {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "is_false")]
        gemspec: bool,
    },
    Git {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
        rev: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision: Option<String>,
    },
    Registry {
        #[serde(default)]
        remotes: Vec<String>,
    },
    Plugin {
        #[serde(rename = "type")]
        plugin: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        options: BTreeMap<String, toml::Value>,
    },
}

/// Lockfile contents: the lock view in persisted order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default)]
    pub sources: Vec<LockedSource>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

mod lockfile;
mod parse;

pub use lockfile::{load_lockfile, save_lockfile};
pub use parse::{load_manifest, parse_manifest};

#[cfg(test)]
mod tests;
