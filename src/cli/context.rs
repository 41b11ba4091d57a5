//! What the CLI needs before extracting: where to look and the merged settings
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::{Config, OutputFormat};

#[derive(Debug)]
pub struct CliContext {
    pub dir: PathBuf,
    pub config: Config,
}

impl CliContext {
    /// An explicit `config_file` must exist, otherwise `gitsnap.toml` in `dir` is used if present
    pub fn new(dir: &Path, config_file: Option<&Path>) -> Result<Self> {
        if !dir.exists() {
            bail!("Directory {} does not exist", dir.display());
        }

        let config = match config_file {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => Config::from_dir(dir)?,
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            config,
        })
    }

    /// Flags given on the command line win over the config file
    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.config.format).unwrap_or_default()
    }

    pub fn property_prefix<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.config.property_prefix.as_deref())
    }
}
