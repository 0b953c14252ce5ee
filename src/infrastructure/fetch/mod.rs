//! Template retrieval
//!
//! The provisioning server is an external collaborator; actions only see the
//! [`ContentFetcher`] seam so tests and alternative transports can stand in.

pub mod http_fetcher;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_objects::SourceUrl;

pub use http_fetcher::HttpFetcher;

/// Errors raised while retrieving a template
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Transport failures and server-side errors may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Retrieves the raw text behind an absolute URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &SourceUrl) -> Result<String, FetchError>;
}
