use std::env;
use std::path::PathBuf;

use crate::common::result::ZtpResult;
use crate::infrastructure::filesystem::config_store::{AgentConfigStore, DEFAULT_CONFIG_FILE};

const SAMPLE_CONFIG: &str = include_str!("../../../../templates/ztpboot.yaml");

/// Write a sample agent configuration
pub struct InitCommand {
    /// Directory where to create the ztpboot.yaml file
    pub path: Option<PathBuf>,
    /// Force overwrite existing file
    pub force: bool,
}

impl InitCommand {
    pub fn new(path: Option<PathBuf>, force: bool) -> Self {
        Self { path, force }
    }

    /// Execute the init command
    pub fn execute(&self) -> ZtpResult<i32> {
        let target_dir = match &self.path {
            Some(path) => path.clone(),
            None => env::current_dir()?,
        };
        let target_file = target_dir.join(DEFAULT_CONFIG_FILE);

        AgentConfigStore::new().write_raw(&target_file, SAMPLE_CONFIG, self.force)?;

        println!("✅ Successfully created {}", DEFAULT_CONFIG_FILE);
        println!("📁 Location: {}", target_file.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Set 'server' to your provisioning server");
        println!("   2. Run 'ztpboot run <definition>' to provision this device");

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AgentConfig;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_matches_defaults() {
        let temp_dir = TempDir::new().unwrap();
        InitCommand::new(Some(temp_dir.path().to_path_buf()), false)
            .execute()
            .unwrap();

        let config = AgentConfigStore::new()
            .load(temp_dir.path().join(DEFAULT_CONFIG_FILE))
            .unwrap();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn test_existing_file_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let command = InitCommand::new(Some(temp_dir.path().to_path_buf()), false);
        command.execute().unwrap();
        assert!(command.execute().is_err());

        InitCommand::new(Some(temp_dir.path().to_path_buf()), true)
            .execute()
            .unwrap();
    }
}
