pub mod config_accumulator;
pub mod definition_service;

pub use config_accumulator::{AccumulatorError, ConfigAccumulator, ConfigSink, SessionSink};
pub use definition_service::{DefinitionError, DefinitionService};
