use std::path::PathBuf;

use crate::common::error::ZtpError;
use crate::common::result::{ResultExt, ZtpResult};
use crate::common::templates::TemplateProcessor;
use crate::domain::entities::VariableMap;

/// Substitute variables in a local template without touching the startup-config
pub struct RenderCommand {
    pub template: PathBuf,
    pub variables: VariableMap,
}

impl RenderCommand {
    pub fn new(template: PathBuf, variables: VariableMap) -> Self {
        Self {
            template,
            variables,
        }
    }

    pub async fn execute(&self) -> ZtpResult<i32> {
        let content = tokio::fs::read_to_string(&self.template)
            .await
            .with_filesystem_error("Unable to read template", Some(self.template.clone()))?;

        let resolved = TemplateProcessor::new()
            .process(&content, &self.variables)
            .map_err(ZtpError::from)?;

        print!("{}", resolved);
        Ok(0)
    }
}
