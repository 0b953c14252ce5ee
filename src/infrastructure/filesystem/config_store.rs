use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::domain::entities::AgentConfig;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "ztpboot.yaml";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file already exists: {0}")]
    AlreadyExists(String),

    #[error("Configuration file read failed for {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file write failed for {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing failed for {path}: {source}")]
    YamlParsingFailed {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(#[from] validator::ValidationErrors),
}

/// Loads and writes the agent configuration file
#[derive(Debug, Clone, Default)]
pub struct AgentConfigStore;

impl AgentConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<AgentConfig, ConfigStoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigStoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config = self.parse(&content, path)?;

        debug!(path = %path.display(), "loaded agent config");
        Ok(config)
    }

    /// Load the explicit file, or `ztpboot.yaml` from the working directory
    /// when present, or fall back to defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load_or_default(&self, path: Option<&Path>) -> Result<AgentConfig, ConfigStoreError> {
        match path {
            Some(path) => self.load(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    self.load(default_path)
                } else {
                    Ok(AgentConfig::default())
                }
            }
        }
    }

    /// Write raw configuration content, refusing to overwrite unless `force`
    pub fn write_raw<P: AsRef<Path>>(
        &self,
        path: P,
        content: &str,
        force: bool,
    ) -> Result<(), ConfigStoreError> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(ConfigStoreError::AlreadyExists(path.display().to_string()));
        }

        // content must load back as a valid config
        self.parse(content, path)?;

        let write_failed = |source| ConfigStoreError::WriteFailed {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        fs::write(path, content).map_err(write_failed)
    }

    fn parse(&self, content: &str, path: &Path) -> Result<AgentConfig, ConfigStoreError> {
        let config: AgentConfig = if content.trim().is_empty() {
            AgentConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| ConfigStoreError::YamlParsingFailed {
                path: path.display().to_string(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }
}
