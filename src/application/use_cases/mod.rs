pub mod add_config;
pub mod run_session;
pub mod startup_config;

use crate::application::services::config_accumulator::AccumulatorError;
use crate::domain::entities::ActionError;
use thiserror::Error;

pub use add_config::AddConfigUseCase;
pub use run_session::{ActionReport, RunSessionConfig, RunSessionUseCase, SessionError, SessionReport};
pub use startup_config::StartupConfigUseCase;

/// Failure while executing a single action
///
/// `Action` carries an outcome code for the dispatch loop. `Sink` means the
/// accumulator itself rejected the append and the session cannot continue.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Sink(#[from] AccumulatorError),
}
