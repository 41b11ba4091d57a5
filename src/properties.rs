use std::fmt;

use crate::consts::PROPERTY_NAMESPACE;
use crate::snapshot::RepositorySnapshot;

/// A snapshot flattened to build properties, in a stable order.
/// Keys are `git.<name>`, or `git.<prefix>.<name>` when a prefix is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

fn key(prefix: Option<&str>, name: &str) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => format!("{PROPERTY_NAMESPACE}.{p}.{name}"),
        None => format!("{PROPERTY_NAMESPACE}.{name}"),
    }
}

impl Properties {
    pub fn from_snapshot(snapshot: &RepositorySnapshot, prefix: Option<&str>) -> Self {
        let tag = snapshot.tag.as_ref();
        let author = tag.and_then(|t| t.author());
        // Git accepts offsets past +-25:59:59, those dates stay blank instead of failing the export
        let commit_date = snapshot
            .head_commit_time
            .to_date_string()
            .unwrap_or_else(|e| {
                log::warn!("Could not format commit date: {e}");
                String::new()
            });

        let values = [
            ("branch", snapshot.current_branch.clone()),
            ("workingcopy.dirty", snapshot.working_copy_dirty.to_string()),
            ("commit", snapshot.head_commit_id.clone()),
            ("commit.short", snapshot.head_commit_id_short.clone()),
            ("commit.date", commit_date),
            ("tag", snapshot.tag_name().unwrap_or_default().to_string()),
            (
                "tag.hash",
                tag.map(|t| t.candidate.object.id().to_string())
                    .unwrap_or_default(),
            ),
            ("tag.dirty", snapshot.tag_dirty().unwrap_or(true).to_string()),
            (
                "tag.author.name",
                author.map(|a| a.name.clone()).unwrap_or_default(),
            ),
            (
                "tag.author.email",
                author.map(|a| a.email.clone()).unwrap_or_default(),
            ),
            ("dirty", snapshot.is_dirty().to_string()),
            ("version", snapshot.version()),
        ];

        Self {
            entries: values
                .into_iter()
                .map(|(name, value)| (key(prefix, name), value))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.iter() {
            writeln!(f, "{k}={v}")?;
        }
        Ok(())
    }
}
