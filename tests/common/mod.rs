#![allow(dead_code)]
use std::path::Path;

use git2::{
    IndexAddOption, IndexEntry, IndexTime, ObjectType, Oid, Repository, RepositoryInitOptions,
    Signature, Time,
};
use tempfile::TempDir;

/// A throwaway repository on `main`, driven through libgit2 so tests don't need a git binary
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

fn signature(seconds: i64) -> Signature<'static> {
    Signature::new("Test", "test@example.com", &Time::new(seconds, 0)).unwrap()
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.path().join(name)).unwrap();
    }

    /// Stages everything in the working copy and commits it on HEAD
    pub fn commit(&self, message: &str, seconds: i64) -> Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parent = self.repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<_> = parent.iter().collect();
        let sig = signature(seconds);
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// A commit on top of `parent` that no branch points at, reusing the parent's tree
    pub fn detached_commit(&self, parent: Oid, seconds: i64) -> Oid {
        let parent = self.repo.find_commit(parent).unwrap();
        let tree = parent.tree().unwrap();
        let sig = signature(seconds);
        self.repo
            .commit(None, &sig, &sig, "side", &tree, &[&parent])
            .unwrap()
    }

    pub fn lightweight_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    pub fn annotated_tag(&self, name: &str, target: Oid, tagger: &str) -> Oid {
        let object = self.repo.find_object(target, None).unwrap();
        let sig = Signature::new(tagger, "tagger@example.com", &Time::new(1_000, 0)).unwrap();
        self.repo
            .tag(name, &object, &sig, "release", false)
            .unwrap()
    }

    pub fn checkout_detached(&self, target: Oid) {
        self.repo.set_head_detached(target).unwrap();
    }

    /// Moves every tag into `packed-refs` with its peeled id, like `git pack-refs --all` does
    pub fn pack_tag_refs(&self) {
        let mut tags = Vec::new();
        for reference in self.repo.references_glob("refs/tags/*").unwrap() {
            let reference = reference.unwrap();
            let name = reference.name().unwrap().to_string();
            let target = reference.target().unwrap();
            let peeled = self
                .repo
                .find_object(target, None)
                .unwrap()
                .peel(ObjectType::Commit)
                .unwrap()
                .id();
            tags.push((name, target, peeled));
        }
        tags.sort();

        let mut packed = String::from("# pack-refs with: peeled fully-peeled sorted \n");
        for (name, target, peeled) in &tags {
            packed.push_str(&format!("{target} {name}\n"));
            if peeled != target {
                packed.push_str(&format!("^{peeled}\n"));
            }
        }
        let git_dir = self.repo.path();
        std::fs::write(git_dir.join("packed-refs"), packed).unwrap();
        for (name, _, _) in &tags {
            std::fs::remove_file(git_dir.join(name)).unwrap();
        }
    }

    /// Creates a repository at `name` inside the working copy with one commit in it
    pub fn nested_repo(&self, name: &str) -> (Repository, Oid) {
        let nested = Repository::init(self.path().join(name)).unwrap();
        let head = commit_file(&nested, "nested.txt", "nested\n", 500);
        (nested, head)
    }

    /// Commits `target` as a submodule at `name`, leaving the rest of the index as it is
    pub fn commit_gitlink(&self, name: &str, target: Oid, seconds: i64) -> Oid {
        self.write(
            ".gitmodules",
            &format!("[submodule \"{name}\"]\n\tpath = {name}\n\turl = ./{name}\n"),
        );
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(".gitmodules")).unwrap();
        index
            .add(&IndexEntry {
                ctime: IndexTime::new(0, 0),
                mtime: IndexTime::new(0, 0),
                dev: 0,
                ino: 0,
                mode: 0o160000,
                uid: 0,
                gid: 0,
                file_size: 0,
                id: target,
                flags: 0,
                flags_extended: 0,
                path: name.as_bytes().to_vec(),
            })
            .unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

        let parent = self.repo.head().unwrap().peel_to_commit().unwrap();
        let sig = signature(seconds);
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "add submodule", &tree, &[&parent])
            .unwrap()
    }
}

/// Writes `file` into the working copy of `repo` and commits it on HEAD
pub fn commit_file(repo: &Repository, file: &str, content: &str, seconds: i64) -> Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(file), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
    let parents: Vec<_> = parent.iter().collect();
    let sig = signature(seconds);
    repo.commit(Some("HEAD"), &sig, &sig, "nested", &tree, &parents)
        .unwrap()
}
