use std::cell::Cell;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use super::{FetchMode, SourceKind};
use crate::error::{Result, SourceError};

/// Options record for a path source, as declared in a manifest.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOptions {
    pub path: PathBuf,
    /// The path holds a package spec file rather than a plain directory.
    #[serde(default)]
    pub gemspec: bool,
    /// Unqualified dependencies resolve from this source.
    #[serde(default)]
    pub global: bool,
}

impl PathOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A local filesystem source. Re-read on every resolution.
#[derive(Clone, Debug)]
pub struct PathSource {
    path: PathBuf,
    gemspec: bool,
    global: Cell<bool>,
    pub(super) mode: FetchMode,
}

impl PathSource {
    pub fn new(options: PathOptions) -> Result<Self> {
        if options.path.as_os_str().is_empty() {
            return Err(SourceError::invalid_options(SourceKind::Path, "missing `path`"));
        }
        Ok(Self {
            path: without_current_dir(&options.path),
            gemspec: options.gemspec,
            global: Cell::new(options.global),
            mode: FetchMode::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_gemspec(&self) -> bool {
        self.gemspec
    }

    pub fn is_global_default(&self) -> bool {
        self.global.get()
    }

    /// Carry the global-default flag over from the declaration this
    /// source replaces. Lockfiles do not record it.
    pub fn inherit_global(&self, declared: &PathSource) {
        if declared.is_global_default() {
            self.global.set(true);
        }
    }
}

/// Drop `.` components so `./vendor` and `vendor` name one source.
/// Purely lexical: `..` and symlinks are left alone.
fn without_current_dir(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

impl PartialEq for PathSource {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.gemspec == other.gemspec
    }
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gemspec {
            write!(f, "spec file at `{}`", self.path.display())
        } else {
            write!(f, "source at `{}`", self.path.display())
        }
    }
}
