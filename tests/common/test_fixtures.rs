//! Test fixtures for definitions and workspaces

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding the startup-config and any written files
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn startup_config(&self) -> PathBuf {
        self.dir.path().join("startup-config")
    }

    /// Write a file relative to the workspace and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Lines of the persisted startup-config
    pub fn startup_config_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.startup_config())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Builds definition YAML documents
pub struct DefinitionFixture {
    name: String,
    shared: Vec<String>,
    actions: Vec<String>,
}

impl DefinitionFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shared: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Definition-wide `ztps_server` attribute
    pub fn with_shared_server(mut self, server: &str) -> Self {
        self.shared.push(format!("  ztps_server: \"{}\"", server));
        self
    }

    pub fn startup_config(mut self, name: &str, lines: &[&str]) -> Self {
        let lines = lines
            .iter()
            .map(|l| format!("        - \"{}\"", l))
            .collect::<Vec<_>>()
            .join("\n");
        self.actions.push(format!(
            "  - name: {}\n    action: startup_config\n    attributes:\n      lines:\n{}",
            name, lines
        ));
        self
    }

    pub fn add_config(mut self, name: &str, url: &str, variables: &[(&str, &str)]) -> Self {
        let mut action = format!(
            "  - name: {}\n    action: add_config\n    attributes:\n      url: \"{}\"",
            name, url
        );
        if !variables.is_empty() {
            action.push_str("\n      variables:");
            for (key, value) in variables {
                action.push_str(&format!("\n        {}: \"{}\"", key, value));
            }
        }
        self.actions.push(action);
        self
    }

    /// add_config without any attributes
    pub fn add_config_without_url(mut self, name: &str) -> Self {
        self.actions
            .push(format!("  - name: {}\n    action: add_config", name));
        self
    }

    pub fn build(&self) -> String {
        let mut yaml = format!("name: \"{}\"\n", self.name);
        if !self.shared.is_empty() {
            yaml.push_str("attributes:\n");
            yaml.push_str(&self.shared.join("\n"));
            yaml.push('\n');
        }
        yaml.push_str("actions:\n");
        yaml.push_str(&self.actions.join("\n"));
        yaml.push('\n');
        yaml
    }
}

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
