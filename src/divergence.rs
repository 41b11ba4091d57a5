use std::collections::BTreeSet;

use crate::error::ExtractError;
use crate::git::{DivergenceSet, FileMode, Oid, RepositoryAccess};

/// Gitlinks move whenever the embedded repository's HEAD does, and symlink content doesn't
/// compare reliably across file systems. Neither makes the outer tree dirty.
pub fn is_ignorable_mode(mode: FileMode) -> bool {
    matches!(mode, FileMode::Gitlink | FileMode::Link)
}

/// Paths of the set that count towards dirtiness, deduplicated across categories.
/// Paths that don't exist in the reference tree are always kept.
pub fn dirty_paths(set: &DivergenceSet) -> BTreeSet<&str> {
    set.entries()
        .iter()
        .filter(|entry| !entry.reference_mode.is_some_and(is_ignorable_mode))
        .map(|entry| entry.path.as_str())
        .collect()
}

/// Whether the working copy differs from the tree of `commit` in a way that matters.
pub fn is_dirty(access: &impl RepositoryAccess, commit: &Oid) -> Result<bool, ExtractError> {
    let set = access.diff_against_working_copy(commit)?;
    if log::log_enabled!(log::Level::Debug) {
        for entry in set.entries() {
            log::debug!("{} {} (relative to {commit})", entry.kind, entry.path);
        }
    }

    let paths = dirty_paths(&set);
    log::debug!(
        "{} path(s) differ from {commit} once links are ignored",
        paths.len()
    );
    Ok(!paths.is_empty())
}
