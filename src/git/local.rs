use std::path::{Path, PathBuf};

use git2::{Delta, DiffOptions, ErrorCode, ObjectType, Repository, Tree};

use crate::consts::TAG_REF_GLOB;
use crate::error::ExtractError;
use crate::git::{
    CommitInfo, CommitTime, DivergenceKind, DivergenceSet, FileMode, GitObject, Oid,
    RepositoryAccess, Signature, TagObject, TagRef,
};

/// A repository on disk, read through libgit2.
/// The handle and everything libgit2 keeps open for it are released on drop.
pub struct LocalRepository {
    repo: Repository,
    path: PathBuf,
}

impl LocalRepository {
    /// Finds the repository containing `path`, walking up parent directories like git does.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        log::debug!("Opening git repository at {}", path.display());
        if !path.exists() {
            return Err(ExtractError::repository_not_found(
                path,
                git2::Error::from_str("No such directory"),
            ));
        }

        let repo = Repository::discover(path)
            .map_err(|e| ExtractError::repository_not_found(path, e))?;

        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn find_oid(&self, id: &Oid) -> Result<git2::Oid, ExtractError> {
        git2::Oid::from_str(id.as_str()).map_err(|e| ExtractError::object_resolution(id, e))
    }

    fn commit_info(&self, commit: &git2::Commit<'_>) -> Result<CommitInfo, ExtractError> {
        let id = Oid::from(commit.id());
        let short_id = commit
            .as_object()
            .short_id()
            .map_err(|e| ExtractError::object_resolution(&id, e))?
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| id.as_str().to_string());
        let time = commit.time();

        Ok(CommitInfo {
            short_id,
            time: CommitTime::new(time.seconds(), time.offset_minutes()),
            parents: commit.parent_ids().map(Oid::from).collect(),
            tree: Oid::from(commit.tree_id()),
            id,
        })
    }

    fn head_reference(&self) -> Result<git2::Reference<'_>, ExtractError> {
        match self.repo.head() {
            Ok(head) => Ok(head),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Err(ExtractError::no_head())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn reference_mode(tree: &Tree<'_>, path: &str) -> Result<Option<FileMode>, git2::Error> {
    match tree.get_path(Path::new(path)) {
        Ok(entry) => Ok(Some(FileMode::from(entry.filemode()))),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn delta_path(delta: &git2::DiffDelta<'_>) -> Option<String> {
    let file = if delta.status() == Delta::Deleted {
        delta.old_file()
    } else {
        delta.new_file()
    };
    file.path().map(|p| p.to_string_lossy().into_owned())
}

impl RepositoryAccess for LocalRepository {
    fn head(&self) -> Result<CommitInfo, ExtractError> {
        let commit = self.head_reference()?.peel_to_commit()?;
        self.commit_info(&commit)
    }

    fn current_branch(&self) -> Result<String, ExtractError> {
        let head = self.head_reference()?;
        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        // Detached HEAD, name it by the commit
        let commit = head.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn tag_refs(&self) -> Result<Vec<TagRef>, ExtractError> {
        let mut tags = Vec::new();
        for reference in self.repo.references_glob(TAG_REF_GLOB)? {
            let reference = reference?.resolve()?;
            let Some(name) = reference.name() else {
                let lossy = String::from_utf8_lossy(reference.name_bytes());
                return Err(git2::Error::from_str(&format!(
                    "Tag ref `{lossy}` does not have a valid UTF-8 name"
                ))
                .into());
            };
            let Some(target) = reference.target() else {
                continue;
            };

            tags.push(TagRef {
                name: name.trim_start_matches("refs/tags/").to_string(),
                target: Oid::from(target),
                peeled: reference.target_peel().map(Oid::from),
            });
        }

        Ok(tags)
    }

    fn read_object(&self, id: &Oid) -> Result<GitObject, ExtractError> {
        let oid = self.find_oid(id)?;
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| ExtractError::object_resolution(id, e))?;

        match object.kind() {
            Some(ObjectType::Commit) => {
                let commit = object
                    .peel_to_commit()
                    .map_err(|e| ExtractError::object_resolution(id, e))?;
                Ok(GitObject::Commit(self.commit_info(&commit)?))
            }
            Some(ObjectType::Tag) => {
                let tag = object.as_tag().ok_or_else(|| {
                    ExtractError::object_resolution(id, git2::Error::from_str("Not a tag object"))
                })?;
                let tagger = tag.tagger().map(|s| Signature {
                    name: s.name().unwrap_or_default().to_string(),
                    email: s.email().unwrap_or_default().to_string(),
                });
                Ok(GitObject::Tag(TagObject {
                    id: id.clone(),
                    target: Oid::from(tag.target_id()),
                    tagger,
                }))
            }
            Some(ObjectType::Tree) => Ok(GitObject::Tree(id.clone())),
            Some(ObjectType::Blob) => Ok(GitObject::Blob(id.clone())),
            _ => Err(ExtractError::object_resolution(
                id,
                git2::Error::from_str("Unknown object type"),
            )),
        }
    }

    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, ExtractError> {
        let candidate = self.find_oid(candidate)?;
        let of = self.find_oid(of)?;
        Ok(self.repo.graph_descendant_of(of, candidate)?)
    }

    fn diff_against_working_copy(&self, commit: &Oid) -> Result<DivergenceSet, ExtractError> {
        let oid = self.find_oid(commit)?;
        let to_err = |e: git2::Error| ExtractError::divergence(commit, e);

        let tree = self
            .repo
            .find_commit(oid)
            .and_then(|c| c.tree())
            .map_err(to_err)?;
        let index = self.repo.index().map_err(to_err)?;

        let mut opts = DiffOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .include_typechange(true);

        let mut set = DivergenceSet::new();

        let staged = self
            .repo
            .diff_tree_to_index(Some(&tree), Some(&index), Some(&mut opts))
            .map_err(to_err)?;
        for delta in staged.deltas() {
            let kind = match delta.status() {
                Delta::Added => DivergenceKind::Added,
                Delta::Deleted => DivergenceKind::Removed,
                Delta::Unmodified | Delta::Untracked | Delta::Ignored => continue,
                _ => DivergenceKind::Changed,
            };
            if let Some(path) = delta_path(&delta) {
                let mode = reference_mode(&tree, &path).map_err(to_err)?;
                set.push(path, kind, mode);
            }
        }

        let unstaged = self
            .repo
            .diff_index_to_workdir(Some(&index), Some(&mut opts))
            .map_err(to_err)?;
        for delta in unstaged.deltas() {
            let kind = match delta.status() {
                Delta::Deleted => DivergenceKind::Missing,
                Delta::Unmodified | Delta::Untracked | Delta::Ignored => continue,
                _ => DivergenceKind::Modified,
            };
            if let Some(path) = delta_path(&delta) {
                let mode = reference_mode(&tree, &path).map_err(to_err)?;
                set.push(path, kind, mode);
            }
        }

        log::debug!(
            "{} raw difference(s) between {commit} and the working copy of {}",
            set.entries().len(),
            self.path.display()
        );
        Ok(set)
    }
}
