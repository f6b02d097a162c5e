use std::cell::OnceCell;
use std::rc::Rc;

use tracing::debug;

use super::SourceList;
use crate::error::{Result, SourceError};
use crate::source::{sort_by_display, Source, SourceKind, SourceRef};

/// First replacement strictly equal to `source`.
fn first_equal(replacements: &[SourceRef], source: &Source) -> Option<SourceRef> {
    replacements
        .iter()
        .find(|replacement| ***replacement == *source)
        .cloned()
}

/// Swap each element for its strictly-equal replacement, in place.
/// Returns `(old, new)` for every swap.
fn replace_in(list: &mut [SourceRef], replacements: &[SourceRef]) -> Vec<(SourceRef, SourceRef)> {
    let mut swapped = Vec::new();
    for slot in list.iter_mut() {
        if let Some(replacement) = first_equal(replacements, &**slot) {
            let old = std::mem::replace(slot, Rc::clone(&replacement));
            swapped.push((old, replacement));
        }
    }
    swapped
}

impl SourceList {
    // ─── Lookup ────────────────────────────────────────────────────

    /// Find the declared source matching `source`: remote-set equivalence
    /// for registry sources, strict equality for the rest.
    ///
    /// The metadata source has no category list and is rejected with
    /// [`SourceError::InvalidSourceKind`].
    pub fn get(&self, source: &Source) -> Result<Option<SourceRef>> {
        let candidates: Vec<SourceRef> = match source.kind() {
            SourceKind::Path => self.path_sources.clone(),
            SourceKind::Git => self.git_sources.clone(),
            SourceKind::Plugin => self.plugin_sources.clone(),
            SourceKind::Registry => self.registry_sources(),
            kind @ SourceKind::Metadata => return Err(SourceError::InvalidSourceKind { kind }),
        };
        Ok(candidates
            .into_iter()
            .find(|candidate| candidate.is_equivalent(source)))
    }

    // ─── Reconciliation ────────────────────────────────────────────

    /// Merge sources read back from a lockfile into the declared ones.
    ///
    /// Declared path, git, and plugin sources are swapped for their
    /// strictly-equal lock counterparts, which may carry state the
    /// declaration lacks (a resolved git revision). In multisource mode the
    /// aggregate becomes the last locked registry source.
    ///
    /// Returns `true` when the declared sources differ from the locked ones
    /// and resolution must run again. An empty lock always differs.
    pub fn replace_sources(&mut self, replacements: &[SourceRef]) -> bool {
        if replacements.is_empty() {
            debug!("no locked sources, treating declared sources as changed");
            return true;
        }

        for (old, new) in replace_in(&mut self.path_sources, replacements) {
            if let (Some(declared), Some(locked)) = (old.as_path(), new.as_path()) {
                locked.inherit_global(declared);
            }
            let was_global = self
                .global_path_source
                .as_ref()
                .is_some_and(|current| Rc::ptr_eq(current, &old));
            if was_global {
                self.global_path_source = Some(new);
            }
        }
        for (old, new) in replace_in(&mut self.git_sources, replacements) {
            if let (Some(declared), Some(locked)) = (old.as_git(), new.as_git()) {
                locked.restore_credentials(declared);
            }
        }
        replace_in(&mut self.plugin_sources, replacements);

        if self.multisource {
            let locked_registry = replacements
                .iter()
                .rev()
                .find(|source| source.kind() == SourceKind::Registry);
            if let Some(registry) = locked_registry {
                self.default_registry = OnceCell::from(Rc::clone(registry));
            }
        }

        let changed = !self.equivalent_sources(replacements);
        debug!(changed, locked = replacements.len(), "reconciled declared sources with lock");
        changed
    }

    /// Whether `replacements` describe the same sources as the lock view.
    ///
    /// Non-registry sources must match element for element once both sides
    /// are sorted by display string. Registry sources must pair up one to
    /// one, in display order, by remote-set equivalence; a count mismatch
    /// is never equivalent.
    pub fn equivalent_sources(&self, replacements: &[SourceRef]) -> bool {
        let (registry, other): (Vec<SourceRef>, Vec<SourceRef>) = replacements
            .iter()
            .cloned()
            .partition(|source| source.kind() == SourceKind::Registry);
        self.equivalent_other_sources(other) && self.equivalent_registry_sources(registry)
    }

    fn equivalent_other_sources(&self, mut locked: Vec<SourceRef>) -> bool {
        sort_by_display(&mut locked);
        let declared = self.lock_other_sources();
        declared.len() == locked.len()
            && declared
                .iter()
                .zip(&locked)
                .all(|(declared, locked)| declared == locked)
    }

    fn equivalent_registry_sources(&self, mut locked: Vec<SourceRef>) -> bool {
        let mut declared = self.lock_registry_sources();
        sort_by_display(&mut declared);
        sort_by_display(&mut locked);
        declared.len() == locked.len()
            && declared
                .iter()
                .zip(&locked)
                .all(|(declared, locked)| registry_equivalent(declared, locked))
    }
}

fn registry_equivalent(a: &Source, b: &Source) -> bool {
    match (a.as_registry(), b.as_registry()) {
        (Some(a), Some(b)) => a.remote_set_equivalent(&b.remotes()),
        _ => false,
    }
}
