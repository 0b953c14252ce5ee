use crate::application::services::config_accumulator::ConfigSink;
use crate::application::use_cases::ExecutionError;
use crate::domain::entities::{ActionLifecycle, ActionState, StartupConfigAttributes};
use tracing::info;

/// startup_configアクション：固定の行をそのまま追記する
#[derive(Debug, Clone, Copy, Default)]
pub struct StartupConfigUseCase;

impl StartupConfigUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        action: &str,
        attributes: &StartupConfigAttributes,
        sink: &mut dyn ConfigSink,
        lifecycle: &mut ActionLifecycle,
    ) -> Result<usize, ExecutionError> {
        let lines: Vec<String> = attributes
            .lines
            .iter()
            .map(|line| line.trim().to_string())
            .collect();

        lifecycle.enter(ActionState::Appending);
        let added = sink.append(lines)?;
        lifecycle.enter(ActionState::Done);

        info!(action, lines = added, "startup_config appended");
        Ok(added)
    }
}
