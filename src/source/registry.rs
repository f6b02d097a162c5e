use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use super::uri::{comparable_remote, normalize_remote};
use super::FetchMode;
use crate::error::Result;

/// Options record for a registry source.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryOptions {
    #[serde(default)]
    pub remotes: Vec<String>,
    /// Locally installed packages may satisfy requirements without a fetch.
    #[serde(default)]
    pub allow_local: bool,
}

impl RegistryOptions {
    pub fn new<I, S>(remotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            remotes: remotes.into_iter().map(Into::into).collect(),
            allow_local: false,
        }
    }
}

/// A source backed by one or more remote package-index endpoints.
///
/// Remotes are kept normalized, duplicate-free, in declaration order.
#[derive(Clone, Debug)]
pub struct RegistrySource {
    remotes: RefCell<Vec<String>>,
    allow_local: bool,
    pub(super) mode: FetchMode,
}

impl RegistrySource {
    pub fn new(options: RegistryOptions) -> Result<Self> {
        let mut remotes: Vec<String> = Vec::new();
        for remote in &options.remotes {
            let remote = normalize_remote(remote)?;
            if !contains_remote(&remotes, &remote) {
                remotes.push(remote);
            }
        }
        Ok(Self {
            remotes: RefCell::new(remotes),
            allow_local: options.allow_local,
            mode: FetchMode::default(),
        })
    }

    /// The empty aggregate: no remotes, local packages allowed.
    pub(crate) fn aggregate() -> Self {
        Self {
            remotes: RefCell::new(Vec::new()),
            allow_local: true,
            mode: FetchMode::default(),
        }
    }

    /// A registry over remotes that are already normalized and unique.
    pub(crate) fn from_remotes(remotes: Vec<String>) -> Self {
        Self {
            remotes: RefCell::new(remotes),
            allow_local: false,
            mode: FetchMode::default(),
        }
    }

    pub fn remotes(&self) -> Vec<String> {
        self.remotes.borrow().clone()
    }

    pub fn allow_local(&self) -> bool {
        self.allow_local
    }

    /// Append a remote unless it is already present.
    pub fn add_remote(&self, remote: &str) -> Result<()> {
        let remote = normalize_remote(remote)?;
        let mut remotes = self.remotes.borrow_mut();
        if !contains_remote(&remotes, &remote) {
            remotes.push(remote);
        }
        Ok(())
    }

    /// Set equality of remotes: order, duplicates, credentials, and the
    /// `allow_local` flag are all ignored.
    pub fn remote_set_equivalent(&self, other_remotes: &[String]) -> bool {
        comparable_set(&self.remotes.borrow()) == comparable_set(other_remotes)
    }

    /// Remotes as written to a lockfile.
    pub fn credential_free_remotes(&self) -> Vec<String> {
        self.remotes
            .borrow()
            .iter()
            .map(|remote| comparable_remote(remote))
            .collect()
    }
}

/// `remote` names an endpoint already in `remotes`, credentials aside.
pub(crate) fn contains_remote(remotes: &[String], remote: &str) -> bool {
    let wanted = comparable_remote(remote);
    remotes
        .iter()
        .any(|existing| comparable_remote(existing) == wanted)
}

fn comparable_set(remotes: &[String]) -> BTreeSet<String> {
    remotes.iter().map(|remote| comparable_remote(remote)).collect()
}

impl PartialEq for RegistrySource {
    fn eq(&self, other: &Self) -> bool {
        self.allow_local == other.allow_local
            && comparable_set(&self.remotes.borrow()) == comparable_set(&other.remotes.borrow())
    }
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remotes = self.credential_free_remotes();
        if remotes.is_empty() {
            f.write_str("locally installed packages")
        } else {
            write!(f, "registry at {}", remotes.join(", "))
        }
    }
}
