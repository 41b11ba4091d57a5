use std::path::{Path, PathBuf};

use fs_err as fs;
use serde::Deserialize;

use crate::consts::CONFIG_FILENAME;

/// How a snapshot gets printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `git.<key>=<value>` lines
    #[default]
    Properties,
    /// The human readable summary
    Text,
    Json,
    /// Only the version string
    Version,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Goes between `git.` and the key name of every exported property
    pub property_prefix: Option<String>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file `{}`", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        toml::from_str(content.as_str()).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `gitsnap.toml` from `dir` if there is one
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
