use crate::application::services::definition_service::DefinitionError;
use crate::application::use_cases::run_session::SessionError;
use crate::common::templates::TemplateError;
use crate::domain::value_objects::OutcomeCode;
use crate::infrastructure::fetch::FetchError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for failures that are not tied to a single action
pub const SESSION_FAILURE_EXIT_CODE: i32 = 4;

#[derive(Error, Debug)]
pub enum ZtpError {
    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ConfigStore(#[from] ConfigStoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl ZtpError {
    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Process exit code for this error
    ///
    /// Errors that carry an action outcome (an invalid definition action, an
    /// unresolved template variable) exit with that outcome code. Everything
    /// else is a session-level failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Definition(DefinitionError::InvalidAction { source, .. }) => {
                source.outcome_code().code()
            }
            Self::Template(TemplateError::MissingVariables(_)) => {
                OutcomeCode::MissingVariable.code()
            }
            _ => SESSION_FAILURE_EXIT_CODE,
        }
    }
}

impl From<std::io::Error> for ZtpError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for ZtpError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for ZtpError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

impl From<validator::ValidationErrors> for ZtpError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        Self::validation_error(field, errors.to_string(), None)
    }
}
