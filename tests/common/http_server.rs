//! Minimal HTTP/1.1 server for fetcher tests
//!
//! Serves fixed bodies per path. A route can be told to fail a number of
//! times before it starts answering, to exercise retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
    /// Answer 503 this many times before serving `status`/`body`
    failures_before_success: usize,
}

#[derive(Default)]
struct ServerState {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
}

/// A test server bound to an ephemeral localhost port
pub struct TestServer {
    base_url: String,
    state: Arc<Mutex<ServerState>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState::default()));

        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let state = server_state.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    loop {
                        match socket.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                read += n;
                                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n")
                                    || read == buf.len()
                                {
                                    break;
                                }
                            }
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]).to_string();
                    let path = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();

                    let (status, body) = respond(&state, &path);
                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        reason(status),
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:40123`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn serve(&self, path: &str, body: &str) {
        self.route(path, 200, body, 0);
    }

    pub fn serve_status(&self, path: &str, status: u16) {
        self.route(path, status, "", 0);
    }

    pub fn serve_after_failures(&self, path: &str, body: &str, failures: usize) {
        self.route(path, 200, body, failures);
    }

    /// Number of requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.hits.get(&normalize(path)).copied().unwrap_or(0)
    }

    fn route(&self, path: &str, status: u16, body: &str, failures_before_success: usize) {
        let mut state = self.state.lock().unwrap();
        state.routes.insert(
            normalize(path),
            Route {
                status,
                body: body.to_string(),
                failures_before_success,
            },
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

fn respond(state: &Arc<Mutex<ServerState>>, path: &str) -> (u16, String) {
    let mut state = state.lock().unwrap();
    let hit = {
        let counter = state.hits.entry(path.to_string()).or_insert(0);
        *counter += 1;
        *counter
    };
    match state.routes.get(path) {
        Some(route) if hit <= route.failures_before_success => (503, String::new()),
        Some(route) => (route.status, route.body.clone()),
        None => (404, String::new()),
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
