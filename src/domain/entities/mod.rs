pub mod action;
pub mod action_state;
pub mod agent_config;
pub mod definition;
pub mod startup_config;

pub use action::{
    ActionConfig, ActionError, ActionKind, ActionSpec, AddConfigAttributes, RawAttributes,
    StartupConfigAttributes, VariableMap,
};
pub use action_state::{ActionLifecycle, ActionState};
pub use agent_config::{AgentConfig, FetchSettings};
pub use definition::Definition;
pub use startup_config::StartupConfig;
