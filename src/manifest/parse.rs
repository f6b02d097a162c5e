use std::path::Path;

use tracing::debug;

use super::Manifest;
use crate::config::Settings;
use crate::error::{Result, SourceError};
use crate::source_list::SourceList;

// ─── Parsing ───────────────────────────────────────────────────────

/// Parse source declarations from manifest content.
pub fn parse_manifest(content: &str) -> std::result::Result<Manifest, toml::de::Error> {
    toml::from_str(content)
}

/// Load a manifest from disk.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|error| SourceError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    parse_manifest(&content).map_err(|error| SourceError::Parse {
        path: path.to_path_buf(),
        error,
    })
}

// ─── Declaration ───────────────────────────────────────────────────

impl Manifest {
    /// Declare every source of this manifest on `list`, in file order per
    /// category: default registry, aggregate remotes, paths, git, explicit
    /// registries, plugins.
    pub fn apply(&self, list: &mut SourceList) -> Result<()> {
        if let Some(source) = &self.source {
            list.set_default_registry_source(source)?;
        }
        for remote in &self.remotes {
            list.add_registry_remote(remote)?;
        }
        for options in &self.path {
            list.add_path_source(options.clone())?;
        }
        for options in &self.git {
            list.add_git_source(options.clone())?;
        }
        for options in &self.registry {
            list.add_registry_source(options.clone())?;
        }
        for options in &self.plugin {
            list.add_plugin_source(options.clone())?;
        }
        debug!(
            paths = list.path_sources().len(),
            git = list.git_sources().len(),
            registries = list.explicit_registry_sources().len(),
            plugins = list.plugin_sources().len(),
            "declared manifest sources"
        );
        Ok(())
    }

    /// A fresh source list holding this manifest's declarations.
    pub fn to_source_list(&self, settings: Settings) -> Result<SourceList> {
        let mut list = SourceList::with_settings(settings);
        self.apply(&mut list)?;
        Ok(list)
    }
}
