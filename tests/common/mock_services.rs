//! Mock services for testing
//!
//! In-memory implementations of the template source so sessions can be run
//! without a provisioning server.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ztpboot::domain::value_objects::SourceUrl;
use ztpboot::infrastructure::fetch::{ContentFetcher, FetchError};

/// Serves templates from memory, optionally delaying individual URLs
#[derive(Clone, Default)]
pub struct InMemoryFetcher {
    templates: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<HashMap<String, u16>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requested: Arc<Mutex<Vec<String>>>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`
    pub fn with_template(self, url: &str, body: &str) -> Self {
        self.templates
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    /// Answer `url` with an HTTP error status
    pub fn with_failure(self, url: &str, status: u16) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(url.to_string(), status);
        self
    }

    /// Delay the response for `url`
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    /// URLs in the order they were requested
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// URLs in the order their responses completed
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for InMemoryFetcher {
    async fn fetch(&self, url: &SourceUrl) -> Result<String, FetchError> {
        let key = url.as_str().to_string();
        self.requested.lock().unwrap().push(key.clone());

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(key.clone());

        if let Some(status) = self.failures.lock().unwrap().get(&key).copied() {
            return Err(FetchError::Status { url: key, status });
        }

        let body = self.templates.lock().unwrap().get(&key).cloned();
        body.ok_or(FetchError::Status {
            url: key,
            status: 404,
        })
    }
}
