use std::path::Path;
use std::rc::Rc;

use super::{LockedSource, Lockfile};
use crate::error::{Result, SourceError};
use crate::source::{
    GitOptions, GitReference, GitSource, PathOptions, PathSource, PluginOptions, PluginSource,
    RegistryOptions, RegistrySource, Source, SourceRef,
};

const LOCKFILE_HEADER: &str = "# sources.lock - DO NOT EDIT MANUALLY\n";

// ─── Conversion ────────────────────────────────────────────────────

impl LockedSource {
    /// The persisted form of a source. The metadata source is never persisted.
    pub fn from_source(source: &Source) -> Option<LockedSource> {
        let locked = match source {
            Source::Path(path) => LockedSource::Path {
                path: path.path().to_path_buf(),
                gemspec: path.is_gemspec(),
            },
            Source::Git(git) => {
                let (branch, tag, rev) = match git.reference() {
                    GitReference::DefaultBranch => (None, None, None),
                    GitReference::Branch(branch) => (Some(branch.clone()), None, None),
                    GitReference::Tag(tag) => (None, Some(tag.clone()), None),
                    GitReference::Rev(rev) => (None, None, Some(rev.clone())),
                };
                LockedSource::Git {
                    uri: git.safe_uri(),
                    branch,
                    tag,
                    rev,
                    revision: git.revision(),
                }
            }
            Source::Registry(registry) => LockedSource::Registry {
                remotes: registry.credential_free_remotes(),
            },
            Source::Plugin(plugin) => LockedSource::Plugin {
                plugin: plugin.plugin().to_string(),
                options: plugin.options().clone(),
            },
            Source::Metadata(_) => return None,
        };
        Some(locked)
    }

    /// Rebuild the source, validating it like a fresh declaration.
    pub fn to_source(&self) -> Result<SourceRef> {
        let source = match self {
            LockedSource::Path { path, gemspec } => Source::Path(PathSource::new(PathOptions {
                path: path.clone(),
                gemspec: *gemspec,
                global: false,
            })?),
            LockedSource::Git {
                uri,
                branch,
                tag,
                rev,
                revision,
            } => Source::Git(GitSource::new(GitOptions {
                uri: uri.clone(),
                branch: branch.clone(),
                tag: tag.clone(),
                rev: rev.clone(),
                revision: revision.clone(),
            })?),
            LockedSource::Registry { remotes } => {
                Source::Registry(RegistrySource::new(RegistryOptions {
                    remotes: remotes.clone(),
                    allow_local: false,
                })?)
            }
            LockedSource::Plugin { plugin, options } => {
                Source::Plugin(PluginSource::new(PluginOptions {
                    plugin: plugin.clone(),
                    options: options.clone(),
                })?)
            }
        };
        Ok(Rc::new(source))
    }
}

impl Lockfile {
    /// Persisted form of a lock view, order preserved.
    pub fn from_sources(sources: &[SourceRef]) -> Lockfile {
        Lockfile {
            sources: sources
                .iter()
                .filter_map(|source| LockedSource::from_source(source))
                .collect(),
        }
    }

    /// Sources to hand to `SourceList::replace_sources`.
    pub fn to_sources(&self) -> Result<Vec<SourceRef>> {
        self.sources.iter().map(LockedSource::to_source).collect()
    }

    pub fn parse(content: &str) -> std::result::Result<Lockfile, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the lockfile text.
    pub fn render(&self) -> Result<String> {
        let body = toml::to_string(self)?;
        Ok(format!("{}{}", LOCKFILE_HEADER, body))
    }
}

// ─── Lockfile I/O ──────────────────────────────────────────────────

/// Load a lockfile from disk.
///
/// Format:
/// ```text
/// # sources.lock - DO NOT EDIT MANUALLY
/// [[sources]]
/// kind = "git"
/// uri = "https://example.com/x.git"
/// branch = "main"
/// revision = "4f3c..."
/// ```
pub fn load_lockfile(path: &Path) -> Result<Lockfile> {
    let content = std::fs::read_to_string(path).map_err(|error| SourceError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    Lockfile::parse(&content).map_err(|error| SourceError::Parse {
        path: path.to_path_buf(),
        error,
    })
}

/// Save a lockfile to disk.
pub fn save_lockfile(path: &Path, lockfile: &Lockfile) -> Result<()> {
    let out = lockfile.render()?;
    std::fs::write(path, out).map_err(|error| SourceError::Io {
        path: path.to_path_buf(),
        error,
    })
}
