//! In-memory repository used by unit tests
use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::ExtractError;
use crate::git::{
    CommitInfo, CommitTime, DivergenceSet, GitObject, Oid, RepositoryAccess, Signature,
    TagObject, TagRef,
};

#[derive(Debug, Default)]
pub(crate) struct MemoryRepository {
    branch: String,
    head: Option<Oid>,
    objects: HashMap<Oid, GitObject>,
    tags: Vec<TagRef>,
    diffs: HashMap<Oid, DivergenceSet>,
    broken_diffs: HashSet<Oid>,
}

impl MemoryRepository {
    pub(crate) fn new(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            ..Default::default()
        }
    }

    /// Adds a commit and returns its id. Ids are derived from `name` so tests stay readable.
    pub(crate) fn commit(&mut self, name: &str, seconds: i64, parents: &[&Oid]) -> Oid {
        let id = Oid::new(format!("{name:_<40}"));
        let info = CommitInfo {
            id: id.clone(),
            short_id: id.as_str()[..7].to_string(),
            time: CommitTime::new(seconds, 0),
            parents: parents.iter().map(|p| (*p).clone()).collect(),
            tree: Oid::new(format!("tree-{name}")),
        };
        self.objects.insert(id.clone(), GitObject::Commit(info));
        id
    }

    pub(crate) fn set_head(&mut self, id: &Oid) {
        self.head = Some(id.clone());
    }

    pub(crate) fn lightweight_tag(&mut self, name: &str, target: &Oid) {
        self.tags.push(TagRef {
            name: name.to_string(),
            target: target.clone(),
            peeled: None,
        });
    }

    fn tag_object(&mut self, name: &str, target: &Oid, tagger: Option<(&str, &str)>) -> Oid {
        let id = Oid::new(format!("tag-{name}"));
        self.objects.insert(
            id.clone(),
            GitObject::Tag(TagObject {
                id: id.clone(),
                target: target.clone(),
                tagger: tagger.map(|(name, email)| Signature {
                    name: name.to_string(),
                    email: email.to_string(),
                }),
            }),
        );
        id
    }

    pub(crate) fn annotated_tag(
        &mut self,
        name: &str,
        target: &Oid,
        tagger: Option<(&str, &str)>,
    ) -> Oid {
        let id = self.tag_object(name, target, tagger);
        self.tags.push(TagRef {
            name: name.to_string(),
            target: id.clone(),
            peeled: None,
        });
        id
    }

    /// An annotated tag whose ref also records where it peels to, like a packed ref does
    pub(crate) fn packed_annotated_tag(&mut self, name: &str, target: &Oid, peeled: &Oid) -> Oid {
        let id = self.tag_object(name, target, None);
        self.tags.push(TagRef {
            name: name.to_string(),
            target: id.clone(),
            peeled: Some(peeled.clone()),
        });
        id
    }

    /// A tag ref pointing at an id that has no object behind it
    pub(crate) fn dangling_tag(&mut self, name: &str) {
        self.tags.push(TagRef {
            name: name.to_string(),
            target: Oid::new("dangling"),
            peeled: None,
        });
    }

    pub(crate) fn tree(&mut self, name: &str) -> Oid {
        let id = Oid::new(format!("tree-{name}"));
        self.objects.insert(id.clone(), GitObject::Tree(id.clone()));
        id
    }

    pub(crate) fn tree_tag(&mut self, name: &str) {
        let id = self.tree(&format!("tagged-{name}"));
        self.tags.push(TagRef {
            name: name.to_string(),
            target: id,
            peeled: None,
        });
    }

    pub(crate) fn set_diff(&mut self, commit: &Oid, set: DivergenceSet) {
        self.diffs.insert(commit.clone(), set);
    }

    pub(crate) fn break_diff(&mut self, commit: &Oid) {
        self.broken_diffs.insert(commit.clone());
    }

    fn commit_info(&self, id: &Oid) -> Option<&CommitInfo> {
        match self.objects.get(id) {
            Some(GitObject::Commit(c)) => Some(c),
            _ => None,
        }
    }
}

impl RepositoryAccess for MemoryRepository {
    fn head(&self) -> Result<CommitInfo, ExtractError> {
        let id = self.head.as_ref().ok_or_else(ExtractError::no_head)?;
        self.commit_info(id)
            .cloned()
            .ok_or_else(|| ExtractError::object_resolution(id, git2::Error::from_str("missing")))
    }

    fn current_branch(&self) -> Result<String, ExtractError> {
        if self.head.is_none() {
            return Err(ExtractError::no_head());
        }
        Ok(self.branch.clone())
    }

    fn tag_refs(&self) -> Result<Vec<TagRef>, ExtractError> {
        Ok(self.tags.clone())
    }

    fn read_object(&self, id: &Oid) -> Result<GitObject, ExtractError> {
        self.objects
            .get(id)
            .cloned()
            .ok_or_else(|| ExtractError::object_resolution(id, git2::Error::from_str("missing")))
    }

    fn is_ancestor(&self, candidate: &Oid, of: &Oid) -> Result<bool, ExtractError> {
        let mut queue: VecDeque<&Oid> = self
            .commit_info(of)
            .map(|c| c.parents.iter().collect())
            .unwrap_or_default();
        let mut seen = HashSet::new();
        while let Some(id) = queue.pop_front() {
            if id == candidate {
                return Ok(true);
            }
            if seen.insert(id) {
                if let Some(c) = self.commit_info(id) {
                    queue.extend(c.parents.iter());
                }
            }
        }
        Ok(false)
    }

    fn diff_against_working_copy(&self, commit: &Oid) -> Result<DivergenceSet, ExtractError> {
        if self.broken_diffs.contains(commit) {
            return Err(ExtractError::divergence(
                commit,
                git2::Error::from_str("permission denied"),
            ));
        }
        Ok(self.diffs.get(commit).cloned().unwrap_or_default())
    }
}
