use serde::Serialize;

use crate::error::ExtractError;
use crate::git::{
    CommitInfo, CommitTime, GitObject, Oid, RepositoryAccess, Signature, TagObject, TagRef,
};

/// The object a tag name addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaggedObject {
    /// Lightweight tag, the ref points straight at the commit
    Commit { id: Oid },
    Annotated(TagObject),
}

impl TaggedObject {
    pub fn id(&self) -> &Oid {
        match self {
            TaggedObject::Commit { id } => id,
            TaggedObject::Annotated(tag) => &tag.id,
        }
    }

    pub fn tagger(&self) -> Option<&Signature> {
        match self {
            TaggedObject::Commit { .. } => None,
            TaggedObject::Annotated(tag) => tag.tagger.as_ref(),
        }
    }
}

/// A tag after dereferencing, with the commit it ultimately names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCandidate {
    pub name: String,
    pub target_commit: Oid,
    pub commit_time: CommitTime,
    pub object: TaggedObject,
}

impl TagCandidate {
    fn new(name: &str, commit: CommitInfo, object: TaggedObject) -> Self {
        Self {
            name: name.to_string(),
            target_commit: commit.id,
            commit_time: commit.time,
            object,
        }
    }
}

fn read_commit(
    access: &impl RepositoryAccess,
    id: &Oid,
) -> Result<Option<CommitInfo>, ExtractError> {
    match access.read_object(id)? {
        GitObject::Commit(c) => Ok(Some(c)),
        _ => Ok(None),
    }
}

/// Follows tag objects until something that isn't a tag shows up.
/// Returns `None` when the chain ends at a tree or a blob.
fn peel_to_commit(
    access: &impl RepositoryAccess,
    tag: &TagObject,
) -> Result<Option<CommitInfo>, ExtractError> {
    let mut target = tag.target.clone();
    loop {
        match access.read_object(&target)? {
            GitObject::Commit(c) => return Ok(Some(c)),
            GitObject::Tag(inner) => target = inner.target,
            GitObject::Tree(_) | GitObject::Blob(_) => return Ok(None),
        }
    }
}

fn resolve_tag_ref(
    access: &impl RepositoryAccess,
    tag_ref: &TagRef,
) -> Result<Option<TagCandidate>, ExtractError> {
    let addressed = access.read_object(&tag_ref.target)?;

    let candidate = match addressed {
        GitObject::Commit(commit) => {
            let object = TaggedObject::Commit {
                id: commit.id.clone(),
            };
            Some(TagCandidate::new(&tag_ref.name, commit, object))
        }
        GitObject::Tag(tag) => {
            // The ref store may already know where the tag ends up
            let commit = match &tag_ref.peeled {
                Some(peeled) => read_commit(access, peeled)?,
                None => peel_to_commit(access, &tag)?,
            };
            commit.map(|c| TagCandidate::new(&tag_ref.name, c, TaggedObject::Annotated(tag)))
        }
        GitObject::Tree(_) | GitObject::Blob(_) => None,
    };

    Ok(candidate)
}

/// Lists every tag of the repository with the commit it names.
///
/// Any tag that can't be read fails the whole catalog: a partial list would quietly skew which
/// tag is picked as the nearest one. Tags of trees or blobs are left out since they can never
/// be part of the history of HEAD.
/// Several tags on the same commit are all kept.
pub fn build_catalog(access: &impl RepositoryAccess) -> Result<Vec<TagCandidate>, ExtractError> {
    let refs = access.tag_refs()?;
    let mut catalog = Vec::with_capacity(refs.len());

    for tag_ref in &refs {
        match resolve_tag_ref(access, tag_ref)? {
            Some(candidate) => catalog.push(candidate),
            None => log::debug!("Tag `{}` does not point at a commit, skipping", tag_ref.name),
        }
    }

    log::debug!("Found {} tag(s) pointing at commits", catalog.len());
    Ok(catalog)
}
