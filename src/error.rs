//! Error types for source declarations, lookups, and lock I/O.

use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceKind;

/// Errors raised by the source layer.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A source was looked up that has no category list (the metadata source).
    #[error("invalid source kind: {kind} sources are not kept in a source list")]
    InvalidSourceKind { kind: SourceKind },

    /// An options record failed validation while constructing a source.
    #[error("invalid {kind} source options: {reason}")]
    InvalidOptions { kind: SourceKind, reason: String },

    /// A registry remote is not a usable URL.
    #[error("invalid registry remote '{remote}': {reason}")]
    InvalidRemote { remote: String, reason: String },

    /// Reading or writing a file failed.
    #[error("cannot access '{}': {}", .path.display(), .error)]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    /// A manifest, lockfile, or settings file is not valid TOML for its schema.
    #[error("cannot parse '{}': {}", .path.display(), .error)]
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },

    /// The lock view could not be rendered.
    #[error("cannot serialize lockfile: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl SourceError {
    pub(crate) fn invalid_options(kind: SourceKind, reason: impl Into<String>) -> Self {
        SourceError::InvalidOptions {
            kind,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
