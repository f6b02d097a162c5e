//! Package sources: where a declared dependency can come from.
//!
//! Five kinds:
//!   - **Path**: a local directory, or a package spec file inside one.
//!   - **Git**: a repository checkout pinned by branch, tag, or rev.
//!   - **Registry**: one or more remote package-index endpoints.
//!   - **Plugin**: a source type provided by a plugin, with free-form options.
//!   - **Metadata**: the synthetic source for locally installed package metadata.
//!
//! Sources are shared through [`SourceRef`] handles. The few attributes that
//! change after construction (a git revision, registry remotes, fetch mode)
//! live behind interior mutability so every holder of the handle sees them.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

mod git;
mod path;
mod plugin;
mod registry;
pub(crate) mod uri;

pub use git::{GitOptions, GitReference, GitSource};
pub use path::{PathOptions, PathSource};
pub use plugin::{PluginOptions, PluginSource};
pub use registry::{RegistryOptions, RegistrySource};
pub(crate) use registry::contains_remote;


/// Shared handle to a source. Category lists and the default slots of a
/// `SourceList` point at the same allocation.
pub type SourceRef = Rc<Source>;

// ─── Kinds ─────────────────────────────────────────────────────────

/// Variant tag of a [`Source`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Path,
    Git,
    Registry,
    Plugin,
    Metadata,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Path => "path",
            SourceKind::Git => "git",
            SourceKind::Registry => "registry",
            SourceKind::Plugin => "plugin",
            SourceKind::Metadata => "metadata",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Fetch Mode ────────────────────────────────────────────────────

/// Resolution-mode flags the fetch layer reads on its next fetch.
///
/// Not part of a source's identity.
#[derive(Clone, Debug, Default)]
pub struct FetchMode {
    allow_cached: Cell<bool>,
    allow_remote: Cell<bool>,
}

impl FetchMode {
    /// Locally cached artifacts may satisfy the next fetch.
    pub fn allow_cached(&self) -> bool {
        self.allow_cached.get()
    }

    /// The next fetch must consult the network.
    pub fn allow_remote(&self) -> bool {
        self.allow_remote.get()
    }
}

// ─── Source ────────────────────────────────────────────────────────

/// A declared origin for resolvable packages.
///
/// `PartialEq` is strict equality: same variant, same defining attributes.
/// `Display` is the display string used to order lock views.
#[derive(Clone, Debug)]
pub enum Source {
    Path(PathSource),
    Git(GitSource),
    Registry(RegistrySource),
    Plugin(PluginSource),
    Metadata(MetadataSource),
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Path(_) => SourceKind::Path,
            Source::Git(_) => SourceKind::Git,
            Source::Registry(_) => SourceKind::Registry,
            Source::Plugin(_) => SourceKind::Plugin,
            Source::Metadata(_) => SourceKind::Metadata,
        }
    }

    pub fn as_path(&self) -> Option<&PathSource> {
        match self {
            Source::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_git(&self) -> Option<&GitSource> {
        match self {
            Source::Git(git) => Some(git),
            _ => None,
        }
    }

    pub fn as_registry(&self) -> Option<&RegistrySource> {
        match self {
            Source::Registry(registry) => Some(registry),
            _ => None,
        }
    }

    pub fn as_plugin(&self) -> Option<&PluginSource> {
        match self {
            Source::Plugin(plugin) => Some(plugin),
            _ => None,
        }
    }

    /// Equivalence used when matching against persisted sources: remote-set
    /// equality for two registry sources, strict equality otherwise.
    pub fn is_equivalent(&self, other: &Source) -> bool {
        match (self, other) {
            (Source::Registry(a), Source::Registry(b)) => a.remote_set_equivalent(&b.remotes()),
            _ => self == other,
        }
    }

    pub fn fetch_mode(&self) -> &FetchMode {
        match self {
            Source::Path(path) => &path.mode,
            Source::Git(git) => &git.mode,
            Source::Registry(registry) => &registry.mode,
            Source::Plugin(plugin) => &plugin.mode,
            Source::Metadata(metadata) => &metadata.mode,
        }
    }

    /// Prefer locally cached artifacts on the next fetch.
    pub fn cached(&self) {
        self.fetch_mode().allow_cached.set(true);
    }

    /// Force remote resolution on the next fetch.
    pub fn remote(&self) {
        self.fetch_mode().allow_remote.set(true);
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Source::Path(a), Source::Path(b)) => a == b,
            (Source::Git(a), Source::Git(b)) => a == b,
            (Source::Registry(a), Source::Registry(b)) => a == b,
            (Source::Plugin(a), Source::Plugin(b)) => a == b,
            (Source::Metadata(_), Source::Metadata(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => fmt::Display::fmt(path, f),
            Source::Git(git) => fmt::Display::fmt(git, f),
            Source::Registry(registry) => fmt::Display::fmt(registry, f),
            Source::Plugin(plugin) => fmt::Display::fmt(plugin, f),
            Source::Metadata(metadata) => fmt::Display::fmt(metadata, f),
        }
    }
}

/// Sort sources by display string. Stable: ties keep their input order.
pub(crate) fn sort_by_display(sources: &mut [SourceRef]) {
    sources.sort_by_cached_key(|source| source.to_string());
}

// ─── Metadata ──────────────────────────────────────────────────────

/// Synthetic source for package metadata already installed locally.
/// Has no configurable attributes.
#[derive(Clone, Debug, Default)]
pub struct MetadataSource {
    mode: FetchMode,
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the local package metadata")
    }
}
