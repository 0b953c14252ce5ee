/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Template retrieval over HTTP(S) or from local files
/// - File system operations (agent config, startup-config persistence)
pub mod fetch;
pub mod filesystem;

// Re-export commonly used types
pub use fetch::{ContentFetcher, FetchError, HttpFetcher};
pub use filesystem::{AgentConfigStore, StartupConfigStore};
