use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::{debug, warn};

use crate::domain::entities::startup_config::{config_lines, StartupConfig};

const BACKUP_MARKER: &str = ".bak_";

/// Startup-config store related errors
#[derive(Debug, Error)]
pub enum StartupConfigStoreError {
    #[error("Invalid startup-config path: {0}")]
    InvalidPath(String),

    #[error("Directory creation failed for {path}: {source}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Startup-config write failed for {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Startup-config read failed for {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Backup operation failed for {path}: {source}")]
    BackupFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of persisting a startup-config
#[derive(Debug, Clone, PartialEq)]
pub struct PersistOutcome {
    /// Final location of the artifact
    pub path: PathBuf,

    /// Number of lines written
    pub lines: usize,

    /// Backup of the previous file, when one was taken
    pub backup: Option<PathBuf>,
}

/// Persists the finalized startup-config to disk
///
/// The file is written to a sibling temp file and renamed into place, so a
/// reader never observes a half-written artifact. With `max_backups > 0` the
/// previous file is copied to `<name>.bak_<timestamp>` first and older
/// backups beyond the limit are pruned.
#[derive(Debug, Clone)]
pub struct StartupConfigStore {
    path: PathBuf,
    max_backups: usize,
}

impl StartupConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_backups: 0,
        }
    }

    pub fn with_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the artifact, replacing any previous file
    pub async fn persist(
        &self,
        config: &StartupConfig,
    ) -> Result<PersistOutcome, StartupConfigStoreError> {
        let path = self.path.as_path();
        let file_name = path
            .file_name()
            .ok_or_else(|| StartupConfigStoreError::InvalidPath(path.display().to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                async_fs::create_dir_all(parent).await.map_err(|source| {
                    StartupConfigStoreError::DirectoryCreationFailed {
                        path: parent.display().to_string(),
                        source,
                    }
                })?;
            }
        }

        let backup = if self.max_backups > 0 && path.exists() {
            Some(self.create_backup().await?)
        } else {
            None
        };

        let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
        let write_failed = |source| StartupConfigStoreError::WriteFailed {
            path: path.display().to_string(),
            source,
        };

        async_fs::write(&temp_path, config.render())
            .await
            .map_err(write_failed)?;
        if let Err(e) = async_fs::rename(&temp_path, path).await {
            let _ = async_fs::remove_file(&temp_path).await;
            return Err(write_failed(e));
        }

        debug!(path = %path.display(), lines = config.len(), "startup-config written");

        Ok(PersistOutcome {
            path: path.to_path_buf(),
            lines: config.len(),
            backup,
        })
    }

    /// Read back the persisted lines, or `None` when no file exists yet
    pub async fn read_lines(&self) -> Result<Option<Vec<String>>, StartupConfigStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = async_fs::read_to_string(&self.path).await.map_err(|source| {
            StartupConfigStoreError::ReadFailed {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        Ok(Some(config_lines(&content)))
    }

    /// Existing backups, newest first
    pub async fn list_backups(&self) -> Result<Vec<PathBuf>, StartupConfigStoreError> {
        let prefix = self.backup_prefix()?;
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };

        let mut backups = Vec::new();
        if let Ok(mut entries) = async_fs::read_dir(&parent).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with(&prefix) {
                    backups.push(entry.path());
                }
            }
        }

        // timestamps sort lexicographically
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(backups)
    }

    async fn create_backup(&self) -> Result<PathBuf, StartupConfigStoreError> {
        let prefix = self.backup_prefix()?;
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%6f");
        let backup_path = self.path.with_file_name(format!("{}{}", prefix, timestamp));

        async_fs::copy(&self.path, &backup_path)
            .await
            .map_err(|source| StartupConfigStoreError::BackupFailed {
                path: backup_path.display().to_string(),
                source,
            })?;

        self.cleanup_old_backups().await?;
        Ok(backup_path)
    }

    async fn cleanup_old_backups(&self) -> Result<(), StartupConfigStoreError> {
        let backups = self.list_backups().await?;
        for backup in backups.iter().skip(self.max_backups) {
            if let Err(e) = async_fs::remove_file(backup).await {
                warn!(path = %backup.display(), error = %e, "failed to prune backup");
            }
        }
        Ok(())
    }

    fn backup_prefix(&self) -> Result<String, StartupConfigStoreError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StartupConfigStoreError::InvalidPath(self.path.display().to_string()))?;
        Ok(format!("{}{}", file_name.to_string_lossy(), BACKUP_MARKER))
    }
}
