mod config;
mod divergence;
mod error;
mod extract;
mod git;
mod properties;
mod reachability;
mod snapshot;
mod tags;

#[cfg(feature = "cli")]
pub mod cli;

pub mod consts;

pub use config::{Config, ConfigError, OutputFormat};
pub use divergence::{dirty_paths, is_dirty, is_ignorable_mode};
pub use error::{ExtractError, ExtractErrorKind};
pub use extract::{extract, extract_from};
pub use git::{
    CommitInfo, CommitTime, DivergenceKind, DivergenceSet, DivergentPath, FileMode, GitObject,
    LocalRepository, Oid, RepositoryAccess, Signature, TagObject, TagRef,
};
pub use properties::Properties;
pub use reachability::nearest_tag;
pub use snapshot::{RepositorySnapshot, ResolvedTag};
pub use tags::{TagCandidate, TaggedObject, build_catalog};
