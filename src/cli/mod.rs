pub mod sources;

use std::path::{Path, PathBuf};
use std::process;

use pkgsource::{Lockfile, Settings, SourceList};

/// File locations shared by every subcommand.
pub struct Paths {
    pub manifest: PathBuf,
    pub lockfile: PathBuf,
    pub config: Option<PathBuf>,
}

/// Load settings from `--config` (or the default location) plus the
/// environment, exiting on error.
pub fn load_settings(config: Option<&Path>) -> Settings {
    let path = config
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::config_path);
    match Settings::load(&path) {
        Ok(settings) => settings.with_env(),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Build the declared source list from the manifest, exiting on error.
pub fn load_source_list(paths: &Paths) -> SourceList {
    if !paths.manifest.exists() {
        eprintln!("error: no {} found", paths.manifest.display());
        process::exit(1);
    }
    let settings = load_settings(paths.config.as_deref());
    let manifest = match pkgsource::manifest::load_manifest(&paths.manifest) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    match manifest.to_source_list(settings) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("error: {}: {}", paths.manifest.display(), e);
            process::exit(1);
        }
    }
}

/// Load the existing lockfile, if any, exiting when it is unreadable.
pub fn load_existing_lock(path: &Path) -> Option<Lockfile> {
    if !path.exists() {
        return None;
    }
    match pkgsource::manifest::load_lockfile(path) {
        Ok(lock) => Some(lock),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
