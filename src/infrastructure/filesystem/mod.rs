pub mod config_store;
pub mod startup_config_store;

pub use config_store::{AgentConfigStore, ConfigStoreError};
pub use startup_config_store::{PersistOutcome, StartupConfigStore, StartupConfigStoreError};
