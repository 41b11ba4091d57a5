/// Appended to versions that are not an exact, clean tag
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";
/// Every exported property starts with this, optionally followed by a user prefix
pub const PROPERTY_NAMESPACE: &str = "git";
pub const CONFIG_FILENAME: &str = "gitsnap.toml";
pub const TAG_REF_GLOB: &str = "refs/tags/*";

/// Same layout as RFC 2822 dates, in the committer's own offset
pub(crate) const COMMIT_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

// Tree entry modes as stored by git
pub(crate) const MODE_TREE: i32 = 0o040000;
pub(crate) const MODE_BLOB: i32 = 0o100644;
pub(crate) const MODE_BLOB_EXECUTABLE: i32 = 0o100755;
pub(crate) const MODE_SYMLINK: i32 = 0o120000;
pub(crate) const MODE_GITLINK: i32 = 0o160000;
