use std::process;

use pkgsource::{Lockfile, SourceList, SourceRef};
use tracing::warn;

use super::{load_existing_lock, load_source_list, Paths};

fn print_category(title: &str, sources: &[SourceRef]) {
    if sources.is_empty() {
        return;
    }
    println!("{} ({}):", title, sources.len());
    for source in sources {
        println!("  {}", source);
    }
}

/// Merge the lock into `list`. Returns `true` when the lock is stale.
fn reconcile(list: &mut SourceList, lock: &Lockfile) -> bool {
    let locked = match lock.to_sources() {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("error: invalid locked source: {}", e);
            process::exit(1);
        }
    };
    list.replace_sources(&locked)
}

// --- pkgsource list ---

pub fn cmd_list(paths: &Paths) {
    let list = load_source_list(paths);

    print_category("Path sources", list.path_sources());
    print_category("Git sources", list.git_sources());
    for git in list.git_sources().iter().filter_map(|s| s.as_git()) {
        let revision = git.revision().unwrap_or_else(|| "unresolved".to_string());
        println!("  cache {} for {} ({})", git.cache_dir_name(), git.safe_uri(), revision);
    }
    print_category("Plugin sources", list.plugin_sources());
    print_category("Registry sources", &list.registry_sources());

    if list.uses_implicit_default() {
        warn!("no registry remote declared; unqualified packages resolve from locally installed packages only");
    }
    println!("\nDefault source: {}", list.default_source());
    if list.is_multisource() {
        println!("Lock mode: single merged registry");
    }
}

// --- pkgsource lock ---

pub fn cmd_lock(paths: &Paths) {
    let mut list = load_source_list(paths);

    let changed = match load_existing_lock(&paths.lockfile) {
        Some(lock) => reconcile(&mut list, &lock),
        None => true,
    };

    let lockfile = Lockfile::from_sources(&list.lock_sources());
    if let Err(e) = pkgsource::manifest::save_lockfile(&paths.lockfile, &lockfile) {
        eprintln!("error writing lockfile: {}", e);
        process::exit(1);
    }
    if changed {
        println!(
            "Locked {} sources. Lockfile written to {}.",
            lockfile.sources.len(),
            paths.lockfile.display()
        );
    } else {
        println!("Sources unchanged ({} locked).", lockfile.sources.len());
    }
}

// --- pkgsource check ---

pub fn cmd_check(paths: &Paths) {
    let mut list = load_source_list(paths);

    let Some(lock) = load_existing_lock(&paths.lockfile) else {
        eprintln!(
            "error: no {} found. Run `pkgsource lock` first.",
            paths.lockfile.display()
        );
        process::exit(1);
    };

    if reconcile(&mut list, &lock) {
        println!(
            "Lockfile {} is stale. Run `pkgsource lock`.",
            paths.lockfile.display()
        );
        process::exit(1);
    }
    println!("Lockfile up to date ({} sources).", lock.sources.len());
}
