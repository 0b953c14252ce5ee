//! # ztpboot - zero-touch provisioning bootstrap agent
//!
//! `ztpboot` runs the actions of a provisioning definition on a freshly booted
//! network device and assembles their output into a single startup-config.
//!
//! ## Features
//!
//! - **Template actions**: fetch a config template, resolve `$name` / `${name}`
//!   placeholders strictly, and append the result to the startup-config
//! - **Ordered accumulation**: every action contributes its lines in declared
//!   order, regardless of when its template arrived
//! - **Outcome codes**: `0` success, `1` missing attribute, `2` fetch failure,
//!   `3` unresolved variable
//! - **Prefetch**: templates can be downloaded concurrently ahead of the
//!   sequential append pass
//!
//! ## Quick Start
//!
//! 1. Write a definition (`definition.yaml`):
//!
//! ```yaml
//! name: leaf
//! attributes:
//!   variables:
//!     hostname: leaf1
//! actions:
//!   - name: base
//!     action: startup_config
//!     attributes:
//!       lines: ["hostname $hostname"]
//!   - name: interfaces
//!     action: add_config
//!     attributes:
//!       url: files/templates/interfaces.template
//! ```
//!
//! 2. Run it against your provisioning server:
//!
//! ```bash
//! ztpboot run definition.yaml --server http://ztps:8080
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: actions, definitions, the startup-config artifact
//! - [`application`]: definition loading, accumulation and the action use cases
//! - [`infrastructure`]: template fetching and file persistence
//! - [`presentation`]: CLI interface
//! - [`common`]: error handling and the placeholder substitution engine
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ztpboot::application::services::DefinitionService;
//! use ztpboot::application::use_cases::{RunSessionConfig, RunSessionUseCase};
//! use ztpboot::domain::entities::FetchSettings;
//! use ztpboot::infrastructure::fetch::HttpFetcher;
//!
//! # async fn example() -> ztpboot::Result<()> {
//! let fetcher = Arc::new(HttpFetcher::new(FetchSettings::default())?);
//! let definition = DefinitionService::new()
//!     .parse_from_file(std::path::Path::new("definition.yaml"))
//!     .await?;
//!
//! let config = RunSessionConfig::new("startup-config")
//!     .with_server(Some("http://ztps:8080".to_string()));
//! let report = RunSessionUseCase::new(config, fetcher)
//!     .execute(definition)
//!     .await?;
//!
//! println!("{}", report.outcome_code());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ZtpError;
pub use crate::common::result::ZtpResult as Result;
