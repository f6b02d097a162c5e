//! The source registry of one resolution session.
//!
//! Sources are declared while the manifest is read, kept one list per
//! category, most recently declared first:
//!
//! ```text
//! path_sources      [newest, ..., oldest]
//! git_sources       [newest, ..., oldest]
//! plugin_sources    [newest, ..., oldest]
//! registry_sources  [newest, ..., oldest]   + default aggregate registry
//! metadata_source   (one per list)
//! ```
//!
//! No list holds two strictly-equal sources. The list itself is never
//! persisted; only its lock view (`lock_sources`) is.

use std::cell::OnceCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::source::{
    GitOptions, GitSource, MetadataSource, PathOptions, PathSource, PluginOptions, PluginSource,
    RegistryOptions, RegistrySource, Source, SourceRef,
};

mod reconcile;
mod views;


// ─── Data Structures ───────────────────────────────────────────────

/// Ordered, deduplicated sources per category plus the default slots.
///
/// Single-threaded: handles are `Rc`, so the list is neither `Send` nor
/// `Sync`. Callers that fetch in parallel must synchronize around it.
#[derive(Debug)]
pub struct SourceList {
    path_sources: Vec<SourceRef>,
    git_sources: Vec<SourceRef>,
    plugin_sources: Vec<SourceRef>,
    /// Explicitly declared registry sources (the aggregate is kept apart).
    registry_sources: Vec<SourceRef>,
    metadata_source: SourceRef,
    /// First path source declared as global default. Always a member of
    /// `path_sources`.
    global_path_source: Option<SourceRef>,
    /// Aggregate registry source, created on first use or assigned once.
    default_registry: OnceCell<SourceRef>,
    multisource: bool,
    settings: Settings,
}

impl Default for SourceList {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `source` at the front of `list` and drop the strictly-equal
/// element it supersedes, if any. Returns the inserted handle and the
/// displaced one.
fn insert_front(list: &mut Vec<SourceRef>, source: Source) -> (SourceRef, Option<SourceRef>) {
    let source = Rc::new(source);
    let displaced = list
        .iter()
        .position(|existing| **existing == *source)
        .map(|index| list.remove(index));
    list.insert(0, Rc::clone(&source));
    if let Some(old) = &displaced {
        debug!(source = %old, "superseded duplicate source declaration");
    }
    (source, displaced)
}

// ─── Construction ──────────────────────────────────────────────────

impl SourceList {
    /// An empty list with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// An empty list reading `settings`. Multisource mode starts from
    /// `lock.multisource`.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            path_sources: Vec::new(),
            git_sources: Vec::new(),
            plugin_sources: Vec::new(),
            registry_sources: Vec::new(),
            metadata_source: Rc::new(Source::Metadata(MetadataSource::default())),
            global_path_source: None,
            default_registry: OnceCell::new(),
            multisource: settings.flag("lock.multisource"),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch multisource mode on: the lock view collapses every registry
    /// remote into one registry source. Set once, before sources are locked.
    pub fn enable_multisource(&mut self) {
        self.multisource = true;
    }

    pub fn is_multisource(&self) -> bool {
        self.multisource
    }

    // ─── Insertion ─────────────────────────────────────────────────

    /// Declare a path source. The first one declared `global` becomes the
    /// global path source.
    pub fn add_path_source(&mut self, options: PathOptions) -> Result<SourceRef> {
        let global = options.global;
        let path = PathSource::new(options)?;
        let (source, displaced) = insert_front(&mut self.path_sources, Source::Path(path));

        if let Some(old) = displaced {
            let was_global = self
                .global_path_source
                .as_ref()
                .is_some_and(|current| Rc::ptr_eq(current, &old));
            if was_global {
                if let (Some(declared), Some(current)) = (old.as_path(), source.as_path()) {
                    current.inherit_global(declared);
                }
                self.global_path_source = Some(Rc::clone(&source));
            }
        }
        if global && self.global_path_source.is_none() {
            self.global_path_source = Some(Rc::clone(&source));
        }
        Ok(source)
    }

    /// Declare a git source. `git://` uris are accepted with a warning
    /// unless `git.allow_insecure` is set.
    pub fn add_git_source(&mut self, options: GitOptions) -> Result<SourceRef> {
        let git = GitSource::new(options)?;
        if git.is_insecure() && !self.settings.flag("git.allow_insecure") {
            warn!(
                uri = %git.safe_uri(),
                "The git source `{}` uses the `git` protocol, which transmits data without \
                 encryption. Set `git.allow_insecure = true` to silence this warning, or \
                 switch to the `https` protocol to keep your data secure.",
                git.safe_uri()
            );
        }
        let (source, _) = insert_front(&mut self.git_sources, Source::Git(git));
        Ok(source)
    }

    /// Declare an explicit registry source.
    pub fn add_registry_source(&mut self, options: RegistryOptions) -> Result<SourceRef> {
        let registry = RegistrySource::new(options)?;
        let (source, _) = insert_front(&mut self.registry_sources, Source::Registry(registry));
        Ok(source)
    }

    /// Declare a plugin-provided source.
    pub fn add_plugin_source(&mut self, options: PluginOptions) -> Result<SourceRef> {
        let plugin = PluginSource::new(options)?;
        let (source, _) = insert_front(&mut self.plugin_sources, Source::Plugin(plugin));
        Ok(source)
    }

    // ─── Default Aggregate ─────────────────────────────────────────

    /// The aggregate registry source, created on first access with no
    /// remotes and local packages allowed.
    pub fn default_registry_source(&self) -> SourceRef {
        Rc::clone(
            self.default_registry
                .get_or_init(|| Rc::new(Source::Registry(RegistrySource::aggregate()))),
        )
    }

    /// Assign the aggregate with a single remote. No-op once an aggregate
    /// exists.
    pub fn set_default_registry_source(&mut self, remote: &str) -> Result<()> {
        if self.default_registry.get().is_some() {
            debug!(remote, "default registry already assigned");
            return Ok(());
        }
        let registry = RegistrySource::new(RegistryOptions {
            remotes: vec![remote.to_string()],
            allow_local: true,
        })?;
        self.default_registry = OnceCell::from(Rc::new(Source::Registry(registry)));
        Ok(())
    }

    /// Append a remote to the aggregate (idempotent) and return it.
    pub fn add_registry_remote(&mut self, remote: &str) -> Result<SourceRef> {
        let aggregate = self.default_registry_source();
        if let Source::Registry(registry) = &*aggregate {
            registry.add_remote(remote)?;
        }
        Ok(aggregate)
    }

    // ─── Mode Propagation ──────────────────────────────────────────

    /// Let every source satisfy its next fetch from local caches.
    pub fn cached(&self) {
        for source in self.all_sources() {
            source.cached();
        }
    }

    /// Make every source consult the network on its next fetch.
    pub fn remote(&self) {
        for source in self.all_sources() {
            source.remote();
        }
    }
}
