use std::fmt;

use serde::Serialize;

use crate::consts::{MODE_BLOB, MODE_BLOB_EXECUTABLE, MODE_GITLINK, MODE_SYMLINK, MODE_TREE};
use crate::error::ExtractError;

mod local;
#[cfg(test)]
pub(crate) mod memory;

pub use local::LocalRepository;

/// Hex id of any git object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Oid(String);

impl Oid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<git2::Oid> for Oid {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// Committer time of a commit, with the offset it was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CommitTime {
    pub seconds: i64,
    pub offset_minutes: i32,
}

impl CommitTime {
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Self {
            seconds,
            offset_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    pub short_id: String,
    pub time: CommitTime,
    pub parents: Vec<Oid>,
    pub tree: Oid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

/// A parsed annotated tag object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagObject {
    pub id: Oid,
    /// What the tag object points at, not necessarily a commit
    pub target: Oid,
    pub tagger: Option<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Commit(CommitInfo),
    Tag(TagObject),
    Tree(Oid),
    Blob(Oid),
}

/// A ref found under `refs/tags/`, as listed by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Name without the `refs/tags/` prefix
    pub name: String,
    pub target: Oid,
    /// Only known when the ref store already recorded it (packed refs)
    pub peeled: Option<Oid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileMode {
    Tree,
    Blob,
    BlobExecutable,
    Link,
    Gitlink,
    Other(i32),
}

impl From<i32> for FileMode {
    fn from(mode: i32) -> Self {
        match mode {
            MODE_TREE => FileMode::Tree,
            MODE_BLOB => FileMode::Blob,
            MODE_BLOB_EXECUTABLE => FileMode::BlobExecutable,
            MODE_SYMLINK => FileMode::Link,
            MODE_GITLINK => FileMode::Gitlink,
            other => FileMode::Other(other),
        }
    }
}

/// How a path differs between a reference tree and the working copy.
/// Tree vs index gives `Added`, `Removed` and `Changed`, index vs disk gives `Missing` and
/// `Modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DivergenceKind {
    Added,
    Removed,
    Changed,
    Modified,
    Missing,
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceKind::Added => write!(f, "added"),
            DivergenceKind::Removed => write!(f, "removed"),
            DivergenceKind::Changed => write!(f, "changed"),
            DivergenceKind::Modified => write!(f, "modified"),
            DivergenceKind::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergentPath {
    pub path: String,
    pub kind: DivergenceKind,
    /// Mode of the path in the reference tree, `None` if the tree does not have it
    pub reference_mode: Option<FileMode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DivergenceSet {
    entries: Vec<DivergentPath>,
}

impl DivergenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        path: impl Into<String>,
        kind: DivergenceKind,
        reference_mode: Option<FileMode>,
    ) {
        self.entries.push(DivergentPath {
            path: path.into(),
            kind,
            reference_mode,
        });
    }

    pub fn entries(&self) -> &[DivergentPath] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the extraction needs from a repository.
/// `LocalRepository` implements it with libgit2, tests use an in-memory graph.
pub trait RepositoryAccess {
    /// The commit HEAD points at. Fails with `NoHead` on an unborn branch.
    fn head(&self) -> Result<CommitInfo, ExtractError>;

    /// Short name of the checked out branch, or the HEAD commit id when detached
    fn current_branch(&self) -> Result<String, ExtractError>;

    fn tag_refs(&self) -> Result<Vec<TagRef>, ExtractError>;

    fn read_object(&self, id: &Oid) -> Result<GitObject, ExtractError>;

    /// Whether `candidate` is a strict ancestor of `of`
    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, ExtractError>;

    /// Raw differences between the tree of `commit` and the working copy, seen through the index
    fn diff_against_working_copy(&self, commit: &Oid) -> Result<DivergenceSet, ExtractError>;
}
