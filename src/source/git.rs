use std::cell::RefCell;
use std::fmt;

use serde::Deserialize;

use super::uri::without_credentials;
use super::{FetchMode, SourceKind};
use crate::error::{Result, SourceError};

/// Options record for a git source.
///
/// At most one of `branch`, `tag`, `ref` may be given. `revision` is the
/// resolved commit, normally only present when read back from a lockfile.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitOptions {
    pub uri: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, rename = "ref")]
    pub rev: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
}

impl GitOptions {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }
}

/// What a git source is pinned to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GitReference {
    DefaultBranch,
    Branch(String),
    Tag(String),
    Rev(String),
}

impl fmt::Display for GitReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitReference::DefaultBranch => f.write_str("HEAD"),
            GitReference::Branch(name) | GitReference::Tag(name) | GitReference::Rev(name) => {
                f.write_str(name)
            }
        }
    }
}

/// A version-control checkout.
///
/// Identity is the credential-free uri plus the reference. The resolved
/// revision is filled in after fetch and travels with the handle.
#[derive(Clone, Debug)]
pub struct GitSource {
    uri: RefCell<String>,
    reference: GitReference,
    revision: RefCell<Option<String>>,
    pub(super) mode: FetchMode,
}

impl GitSource {
    pub fn new(options: GitOptions) -> Result<Self> {
        let uri = options.uri.trim().to_string();
        if uri.is_empty() {
            return Err(SourceError::invalid_options(SourceKind::Git, "missing `uri`"));
        }
        let reference = match (options.branch, options.tag, options.rev) {
            (None, None, None) => GitReference::DefaultBranch,
            (Some(branch), None, None) => GitReference::Branch(branch),
            (None, Some(tag), None) => GitReference::Tag(tag),
            (None, None, Some(rev)) => GitReference::Rev(rev),
            _ => {
                return Err(SourceError::invalid_options(
                    SourceKind::Git,
                    format!("only one of `branch`, `tag`, or `ref` may be given for '{}'", uri),
                ))
            }
        };
        Ok(Self {
            uri: RefCell::new(uri),
            reference,
            revision: RefCell::new(options.revision),
            mode: FetchMode::default(),
        })
    }

    /// The uri as declared, credentials included.
    pub fn uri(&self) -> String {
        self.uri.borrow().clone()
    }

    /// The uri with any `user:password@` removed. This is the form
    /// written to lockfiles and logs.
    pub fn safe_uri(&self) -> String {
        without_credentials(&self.uri.borrow())
    }

    /// Take over the declared uri when it names the same repository.
    /// Locked copies are credential-free, so a swapped-in lock entry gets
    /// the credentials back from the declaration it replaces.
    pub fn restore_credentials(&self, declared: &GitSource) {
        if self.safe_uri() == declared.safe_uri() {
            *self.uri.borrow_mut() = declared.uri();
        }
    }

    pub fn reference(&self) -> &GitReference {
        &self.reference
    }

    /// The resolved commit, if a fetch (or a lockfile) supplied one.
    pub fn revision(&self) -> Option<String> {
        self.revision.borrow().clone()
    }

    pub fn set_revision(&self, revision: impl Into<String>) {
        *self.revision.borrow_mut() = Some(revision.into());
    }

    /// The uri uses the unencrypted `git://` protocol.
    pub fn is_insecure(&self) -> bool {
        self.uri.borrow().starts_with("git://")
    }

    /// Cache directory name for this repository: `<basename>-<12 hex>`,
    /// the hex taken from a BLAKE3 digest of the credential-free uri.
    pub fn cache_dir_name(&self) -> String {
        let safe = self.safe_uri();
        let base = safe
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .unwrap_or_default()
            .trim_end_matches(".git");
        let base = if base.is_empty() { "repo" } else { base };
        let digest = blake3::hash(safe.as_bytes());
        format!("{}-{}", base, &digest.to_hex().as_str()[..12])
    }
}

impl PartialEq for GitSource {
    fn eq(&self, other: &Self) -> bool {
        self.safe_uri() == other.safe_uri() && self.reference == other.reference
    }
}

impl fmt::Display for GitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.safe_uri(), self.reference)
    }
}
