use std::path::Path;

use crate::divergence::is_dirty;
use crate::error::ExtractError;
use crate::git::{LocalRepository, RepositoryAccess};
use crate::reachability::nearest_tag;
use crate::snapshot::{RepositorySnapshot, ResolvedTag};
use crate::tags::build_catalog;

/// Opens the repository containing `path` and reads its snapshot.
/// The repository is closed again before returning, whether extraction worked or not.
pub fn extract(path: impl AsRef<Path>) -> Result<RepositorySnapshot, ExtractError> {
    let repository = LocalRepository::discover(path)?;
    extract_from(&repository)
}

/// Builds the snapshot from any repository. Fails on the first error, there is no partial result.
pub fn extract_from(access: &impl RepositoryAccess) -> Result<RepositorySnapshot, ExtractError> {
    let head = access.head()?;
    let current_branch = access.current_branch()?;
    log::debug!("HEAD is {} on `{current_branch}`", head.id);

    let working_copy_dirty = is_dirty(access, &head.id)?;

    let catalog = build_catalog(access)?;
    let tag = match nearest_tag(access, &head.id, catalog)? {
        Some(candidate) => {
            let dirty = is_dirty(access, &candidate.target_commit)?;
            Some(ResolvedTag { candidate, dirty })
        }
        None => {
            log::debug!("No tag reachable from {}", head.id);
            None
        }
    };

    Ok(RepositorySnapshot::new(
        current_branch,
        head,
        working_copy_dirty,
        tag,
    ))
}
