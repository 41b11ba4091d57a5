use std::fmt;

use serde::Serialize;

use crate::consts::{COMMIT_DATE_FORMAT, SNAPSHOT_SUFFIX};
use crate::git::{CommitInfo, CommitTime, Signature};
use crate::tags::TagCandidate;

impl CommitTime {
    /// Formats the time in the offset the committer recorded, e.g. `Tue, 14 Nov 2023 23:13:20 +0100`
    pub fn to_date_string(&self) -> Result<String, jiff::Error> {
        let offset = jiff::tz::Offset::from_seconds(self.offset_minutes * 60)?;
        let zoned = jiff::Timestamp::from_second(self.seconds)?
            .to_zoned(jiff::tz::TimeZone::fixed(offset));
        Ok(zoned.strftime(COMMIT_DATE_FORMAT).to_string())
    }
}

/// The tag HEAD was resolved to, and whether the working copy still matches it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTag {
    #[serde(flatten)]
    pub candidate: TagCandidate,
    pub dirty: bool,
}

impl ResolvedTag {
    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    /// Only annotated tags have one
    pub fn author(&self) -> Option<&Signature> {
        self.candidate.object.tagger()
    }
}

/// Everything we know about the state of a working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySnapshot {
    pub current_branch: String,
    pub head_commit_id: String,
    pub head_commit_id_short: String,
    pub head_commit_time: CommitTime,
    pub working_copy_dirty: bool,
    /// `None` when no tag is reachable from HEAD
    pub tag: Option<ResolvedTag>,
}

impl RepositorySnapshot {
    pub fn new(
        current_branch: String,
        head: CommitInfo,
        working_copy_dirty: bool,
        tag: Option<ResolvedTag>,
    ) -> Self {
        Self {
            current_branch,
            head_commit_id: head.id.as_str().to_string(),
            head_commit_id_short: head.short_id,
            head_commit_time: head.time,
            working_copy_dirty,
            tag,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_ref().map(|t| t.name())
    }

    /// `None` when there is no tag to compare against
    pub fn tag_dirty(&self) -> Option<bool> {
        self.tag.as_ref().map(|t| t.dirty)
    }

    /// Dirty working copy or commits since the last tag. Having no tag at all counts as dirty.
    pub fn is_dirty(&self) -> bool {
        self.working_copy_dirty || self.tag_dirty().unwrap_or(true)
    }

    /// The version to stamp a build with:
    ///
    /// - `SNAPSHOT` if the working copy has changes
    /// - the tag name if the working copy matches the tag exactly
    /// - `<tag>-<short id>-SNAPSHOT` if things changed since the tag
    /// - `<short id>-SNAPSHOT` if there is no tag
    pub fn version(&self) -> String {
        if self.working_copy_dirty {
            return SNAPSHOT_SUFFIX.to_string();
        }

        match &self.tag {
            Some(tag) if !tag.dirty => tag.name().to_string(),
            Some(tag) => format!(
                "{}-{}-{SNAPSHOT_SUFFIX}",
                tag.name(),
                self.head_commit_id_short
            ),
            None => format!("{}-{SNAPSHOT_SUFFIX}", self.head_commit_id_short),
        }
    }
}

impl fmt::Display for RepositorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Currently on branch {} which has {}",
            self.current_branch,
            if self.working_copy_dirty {
                "uncommitted changes"
            } else {
                "no changes"
            }
        )?;
        writeln!(f, "Last Commit: {}", self.head_commit_id)?;

        let author = self
            .tag
            .as_ref()
            .and_then(|t| t.author())
            .map(|s| s.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("unknown");
        write!(
            f,
            "Last Tag: {} by {author} which is {}",
            self.tag_name().unwrap_or("unknown"),
            if self.tag_dirty().unwrap_or(true) {
                "dirty"
            } else {
                "clean"
            }
        )
    }
}
