use std::path::{Path, PathBuf};

use crate::git::Oid;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
#[non_exhaustive]
pub struct ExtractError {
    pub source: ExtractErrorKind,
}

impl ExtractError {
    pub fn kind(&self) -> &ExtractErrorKind {
        &self.source
    }

    pub(crate) fn repository_not_found(path: &Path, source: git2::Error) -> Self {
        Self {
            source: ExtractErrorKind::RepositoryNotFound {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub(crate) fn no_head() -> Self {
        Self {
            source: ExtractErrorKind::NoHead,
        }
    }

    pub(crate) fn object_resolution(id: &Oid, source: git2::Error) -> Self {
        Self {
            source: ExtractErrorKind::ObjectResolution {
                id: id.to_string(),
                source,
            },
        }
    }

    pub(crate) fn divergence(reference: &Oid, source: git2::Error) -> Self {
        Self {
            source: ExtractErrorKind::DivergenceComputation {
                reference: reference.to_string(),
                source,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractErrorKind {
    #[error("No git repository found at `{}`", path.display())]
    RepositoryNotFound { path: PathBuf, source: git2::Error },
    #[error("Repository has no commits yet, HEAD cannot be resolved")]
    NoHead,
    #[error("Failed to resolve object `{id}`")]
    ObjectResolution { id: String, source: git2::Error },
    #[error("Failed to compare `{reference}` against the working copy")]
    DivergenceComputation {
        reference: String,
        source: git2::Error,
    },
    #[error(transparent)]
    Git(#[from] git2::Error),
}

impl From<git2::Error> for ExtractError {
    fn from(error: git2::Error) -> Self {
        Self {
            source: ExtractErrorKind::Git(error),
        }
    }
}
