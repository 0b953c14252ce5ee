use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ContentFetcher, FetchError};
use crate::domain::entities::FetchSettings;
use crate::domain::value_objects::SourceUrl;

/// `http`/`https` fetcher backed by reqwest, with `file://` support for
/// locally staged templates
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("ztpboot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, settings })
    }

    async fn fetch_http_once(&self, url: &SourceUrl) -> Result<String, FetchError> {
        let request_failed = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.as_url().clone())
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_failed)
    }

    async fn fetch_http(&self, url: &SourceUrl) -> Result<String, FetchError> {
        let delay = Duration::from_millis(self.settings.retry_delay_ms);
        let mut attempt = 0;

        loop {
            match self.fetch_http_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.settings.retries => {
                    attempt += 1;
                    warn!(
                        url = %url,
                        attempt,
                        retries = self.settings.retries,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_file(&self, url: &SourceUrl) -> Result<String, FetchError> {
        let path = url
            .as_url()
            .to_file_path()
            .map_err(|_| FetchError::UnsupportedScheme(url.to_string()))?;

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &SourceUrl) -> Result<String, FetchError> {
        debug!(url = %url, "fetching");
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => self.fetch_file(url).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_file_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leaf.template");
        std::fs::write(&path, "hostname $hostname\n").unwrap();

        let url = SourceUrl::new(url::Url::from_file_path(&path).unwrap().as_str()).unwrap();
        let fetcher = HttpFetcher::new(FetchSettings::default()).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap(), "hostname $hostname\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing");
        let url = SourceUrl::new(url::Url::from_file_path(&path).unwrap().as_str()).unwrap();
        let fetcher = HttpFetcher::new(FetchSettings::default()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let url = SourceUrl::new("ftp://host/cfg").unwrap();
        let fetcher = HttpFetcher::new(FetchSettings::default()).unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(ref s) if s == "ftp"));
    }

    #[test]
    fn test_transient_classification() {
        let server_error = FetchError::Status {
            url: "http://host/x".to_string(),
            status: 503,
        };
        let not_found = FetchError::Status {
            url: "http://host/x".to_string(),
            status: 404,
        };
        assert!(server_error.is_transient());
        assert!(!not_found.is_transient());
    }
}
