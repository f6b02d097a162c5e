use std::rc::Rc;

use super::SourceList;
use crate::source::{contains_remote, sort_by_display, RegistrySource, Source, SourceRef};

/// Keep the first of each group of strictly-equal sources.
fn dedup_strict(sources: Vec<SourceRef>) -> Vec<SourceRef> {
    let mut unique: Vec<SourceRef> = Vec::with_capacity(sources.len());
    for source in sources {
        if !unique.iter().any(|kept| **kept == *source) {
            unique.push(source);
        }
    }
    unique
}

// ─── Category Access ───────────────────────────────────────────────

impl SourceList {
    pub fn path_sources(&self) -> &[SourceRef] {
        &self.path_sources
    }

    pub fn git_sources(&self) -> &[SourceRef] {
        &self.git_sources
    }

    pub fn plugin_sources(&self) -> &[SourceRef] {
        &self.plugin_sources
    }

    /// Explicitly declared registry sources, without the aggregate.
    pub fn explicit_registry_sources(&self) -> &[SourceRef] {
        &self.registry_sources
    }

    pub fn metadata_source(&self) -> SourceRef {
        Rc::clone(&self.metadata_source)
    }

    pub fn global_path_source(&self) -> Option<SourceRef> {
        self.global_path_source.clone()
    }

    // ─── Derived Views ─────────────────────────────────────────────

    /// Where unqualified dependencies resolve from: the global path source
    /// if one was declared, else the aggregate registry.
    pub fn default_source(&self) -> SourceRef {
        self.global_path_source
            .clone()
            .unwrap_or_else(|| self.default_registry_source())
    }

    /// Explicit registry sources in list order, then the aggregate.
    pub fn registry_sources(&self) -> Vec<SourceRef> {
        let mut sources = self.registry_sources.clone();
        sources.push(self.default_registry_source());
        sources
    }

    /// Every remote of every registry source, first-seen order, no repeats.
    pub fn registry_remotes(&self) -> Vec<String> {
        let mut remotes: Vec<String> = Vec::new();
        for source in self.registry_sources() {
            let Some(registry) = source.as_registry() else {
                continue;
            };
            for remote in registry.remotes() {
                if !contains_remote(&remotes, &remote) {
                    remotes.push(remote);
                }
            }
        }
        remotes
    }

    /// All sources: path, git, plugin, registry (with the aggregate), metadata.
    pub fn all_sources(&self) -> Vec<SourceRef> {
        let mut sources: Vec<SourceRef> = self
            .path_sources
            .iter()
            .chain(&self.git_sources)
            .chain(&self.plugin_sources)
            .cloned()
            .collect();
        sources.extend(self.registry_sources());
        sources.push(self.metadata_source());
        sources
    }

    /// True when nothing names a registry remote, so unqualified
    /// dependencies can only come from locally installed packages.
    pub fn uses_implicit_default(&self) -> bool {
        self.registry_sources.is_empty()
            && self
                .default_registry
                .get()
                .and_then(|source| source.as_registry())
                .map_or(true, |registry| registry.remotes().is_empty())
    }

    // ─── Lock View ─────────────────────────────────────────────────

    /// Path, git, and plugin sources sorted by display string.
    pub fn lock_other_sources(&self) -> Vec<SourceRef> {
        let mut sources: Vec<SourceRef> = self
            .path_sources
            .iter()
            .chain(&self.git_sources)
            .chain(&self.plugin_sources)
            .cloned()
            .collect();
        sort_by_display(&mut sources);
        sources
    }

    /// Registry sources as persisted.
    ///
    /// Multisource mode off: every registry source (aggregate included),
    /// sorted by display string, strict duplicates dropped. On: a single
    /// synthetic registry source over `registry_remotes()`.
    pub fn lock_registry_sources(&self) -> Vec<SourceRef> {
        if self.multisource {
            let combined = RegistrySource::from_remotes(self.registry_remotes());
            return vec![Rc::new(Source::Registry(combined))];
        }
        let mut sources = self.registry_sources();
        sort_by_display(&mut sources);
        dedup_strict(sources)
    }

    /// The canonical sequence written to the lockfile.
    pub fn lock_sources(&self) -> Vec<SourceRef> {
        let mut sources = self.lock_other_sources();
        sources.extend(self.lock_registry_sources());
        sources
    }
}
