//! Package source registry for dependency resolution.
//!
//! A [`SourceList`] records every place packages may come from (local
//! paths, git checkouts, remote registries, plugin-provided sources),
//! answers lookups by equivalence, and reconciles declared sources with
//! those read back from a lockfile.

pub mod config;
pub mod error;
pub mod manifest;
pub mod source;
pub mod source_list;

pub use config::Settings;
pub use error::{Result, SourceError};
pub use manifest::{LockedSource, Lockfile, Manifest};
pub use source::{
    GitOptions, GitReference, GitSource, MetadataSource, PathOptions, PathSource, PluginOptions,
    PluginSource, RegistryOptions, RegistrySource, Source, SourceKind, SourceRef,
};
pub use source_list::SourceList;
