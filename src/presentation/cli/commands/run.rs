use colored::Colorize;
use std::sync::Arc;

use crate::application::services::DefinitionService;
use crate::application::use_cases::{RunSessionConfig, RunSessionUseCase, SessionReport};
use crate::common::result::ZtpResult;
use crate::domain::entities::{AgentConfig, Definition};
use crate::infrastructure::fetch::{ContentFetcher, HttpFetcher};
use crate::presentation::cli::OutputFormat;

/// Run every action of a provisioning definition
pub struct RunCommand {
    /// Definition file path or URL
    pub definition: String,
    pub config: AgentConfig,
    pub format: OutputFormat,
}

impl RunCommand {
    pub fn new(definition: String, config: AgentConfig, format: OutputFormat) -> Self {
        Self {
            definition,
            config,
            format,
        }
    }

    /// Execute the run command, returning the process exit code
    pub async fn execute(&self) -> ZtpResult<i32> {
        let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new(self.config.fetch.clone())?);

        let definition = DefinitionService::new()
            .load(
                &self.definition,
                self.config.server.as_deref(),
                fetcher.as_ref(),
            )
            .await?;

        run_session(definition, &self.config, fetcher, self.format).await
    }
}

/// Run a loaded definition and print its report
pub(crate) async fn run_session(
    definition: Definition,
    config: &AgentConfig,
    fetcher: Arc<dyn ContentFetcher>,
    format: OutputFormat,
) -> ZtpResult<i32> {
    if format == OutputFormat::Text {
        println!(
            "{} Running '{}' ({} actions)",
            "::".blue().bold(),
            definition.name,
            definition.actions.len()
        );
    }

    let use_case = RunSessionUseCase::new(RunSessionConfig::from_agent_config(config), fetcher);
    let report = use_case.execute(definition).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            eprintln!("{}", report.outcome_code());
        }
        OutputFormat::Text => print_report(&report),
    }

    Ok(report.outcome_code().code())
}

fn print_report(report: &SessionReport) {
    for action in &report.actions {
        if action.is_success() {
            println!(
                "  {} {} [{}] +{} lines",
                "✓".green().bold(),
                action.name,
                action.kind,
                action.lines
            );
        } else {
            println!(
                "  {} {} [{}] {}",
                "✗".red().bold(),
                action.name,
                action.kind,
                action.error.as_deref().unwrap_or_default().red()
            );
        }
    }
    for name in &report.skipped {
        println!("  {} {} (skipped)", "-".dimmed(), name);
    }

    match &report.persisted {
        Some(path) => println!(
            "{} startup-config written to {} ({} lines)",
            "::".blue().bold(),
            path.display(),
            report.total_lines
        ),
        None => println!(
            "{} startup-config discarded ({} lines)",
            "⚠".yellow().bold(),
            report.total_lines
        ),
    }
    if let Some(backup) = &report.backup {
        println!("  previous file kept as {}", backup.display());
    }

    let code = report.outcome_code();
    match report.failed_action() {
        Some(action) => println!("action '{}' failed: {}", action.name, code),
        None => println!("session '{}' completed: {}", report.definition, code),
    }
}
