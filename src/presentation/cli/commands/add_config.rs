use serde_yaml::Value;
use std::sync::Arc;

use super::run::run_session;
use crate::application::services::DefinitionError;
use crate::common::result::ZtpResult;
use crate::domain::entities::{
    ActionConfig, ActionKind, AgentConfig, Definition, RawAttributes, VariableMap,
};
use crate::infrastructure::fetch::{ContentFetcher, HttpFetcher};
use crate::presentation::cli::OutputFormat;

const ACTION_NAME: &str = "add_config";

/// Run a single add_config action as a one-action session
pub struct AddConfigCommand {
    pub url: Option<String>,
    pub variables: VariableMap,
    pub config: AgentConfig,
    pub format: OutputFormat,
}

impl AddConfigCommand {
    pub fn new(
        url: Option<String>,
        variables: VariableMap,
        config: AgentConfig,
        format: OutputFormat,
    ) -> Self {
        Self {
            url,
            variables,
            config,
            format,
        }
    }

    pub async fn execute(&self) -> ZtpResult<i32> {
        let definition = self.definition()?;
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new(self.config.fetch.clone())?);
        run_session(definition, &self.config, fetcher, self.format).await
    }

    /// Build the attributes the way a definition would carry them, so the
    /// same validation applies
    fn definition(&self) -> Result<Definition, DefinitionError> {
        let mut attributes = RawAttributes::new();
        if let Some(url) = &self.url {
            attributes.insert("url".to_string(), Value::String(url.clone()));
        }
        if !self.variables.is_empty() {
            let mapping = self
                .variables
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), Value::String(v.clone())))
                .collect();
            attributes.insert("variables".to_string(), Value::Mapping(mapping));
        }

        let config = ActionConfig::from_attributes(ActionKind::AddConfig, &attributes).map_err(
            |source| DefinitionError::InvalidAction {
                index: 0,
                name: ACTION_NAME.to_string(),
                source,
            },
        )?;
        Ok(Definition::single(ACTION_NAME, config))
    }
}
