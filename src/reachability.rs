use crate::error::ExtractError;
use crate::git::{Oid, RepositoryAccess};
use crate::tags::TagCandidate;

/// Newest first by commit time. Tags on commits with the same time are ordered by name so the
/// result doesn't depend on the order the ref store lists them in.
fn sort_by_recency(candidates: &mut [TagCandidate]) {
    candidates.sort_by(|a, b| {
        b.commit_time
            .seconds
            .cmp(&a.commit_time.seconds)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn is_reachable(
    access: &impl RepositoryAccess,
    candidate: &TagCandidate,
    head: &Oid,
) -> Result<bool, ExtractError> {
    if &candidate.target_commit == head {
        return Ok(true);
    }
    access.is_ancestor(&candidate.target_commit, head)
}

/// Finds the tag to describe `head` with: the most recent tag, by commit time, whose commit is
/// `head` or one of its ancestors.
///
/// This is not a topological search. With skewed clocks a reachable tag that is further away
/// in the graph can win over a closer one if its commit claims to be newer.
pub fn nearest_tag(
    access: &impl RepositoryAccess,
    head: &Oid,
    mut candidates: Vec<TagCandidate>,
) -> Result<Option<TagCandidate>, ExtractError> {
    sort_by_recency(&mut candidates);

    for candidate in candidates {
        if is_reachable(access, &candidate, head)? {
            log::debug!("Tag `{}` is reachable from {head}", candidate.name);
            return Ok(Some(candidate));
        }
        log::debug!("Tag `{}` is not reachable from {head}", candidate.name);
    }

    Ok(None)
}
