pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use validator::Validate;

use crate::common::error::{ZtpError, SESSION_FAILURE_EXIT_CODE};
use crate::common::result::{OptionExt, ZtpResult};
use crate::domain::entities::{AgentConfig, VariableMap};
use crate::domain::value_objects::FailurePolicy;
use crate::infrastructure::filesystem::AgentConfigStore;

use commands::{AddConfigCommand, InitCommand, RenderCommand, RunCommand};

/// Output format for session reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// ztpboot - zero-touch provisioning bootstrap agent
#[derive(Parser)]
#[command(name = "ztpboot")]
#[command(about = "Zero-touch provisioning bootstrap agent")]
#[command(version)]
#[command(long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), " ", env!("BUILD_DATE"), ")"))]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Agent configuration file (defaults to ./ztpboot.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides shared by every command that runs a session
#[derive(Debug, Clone, clap::Args)]
pub struct SessionArgs {
    /// Provisioning server used to resolve relative URLs
    #[arg(short, long, env = "ZTPS_SERVER")]
    pub server: Option<String>,

    /// Where to write the startup-config
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to do with the startup-config when an action fails
    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Number of templates fetched concurrently ahead of time
    #[arg(long)]
    pub prefetch: Option<usize>,

    /// Number of previous startup-config backups to keep
    #[arg(long)]
    pub backups: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample ztpboot.yaml
    Init {
        /// Directory where to create ztpboot.yaml (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run every action of a provisioning definition
    Run {
        /// Definition file or URL (relative URLs resolve against the server)
        definition: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Run a single add_config action
    AddConfig {
        /// Template URL, absolute or relative to the server
        #[arg(short, long)]
        url: Option<String>,

        /// Template variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Substitute variables in a local template and print the result
    Render {
        /// Template file
        template: PathBuf,

        /// Template variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        colored::control::set_override(!self.cli.no_color);

        match self.handle_command().await {
            Ok(0) => Ok(()),
            Ok(code) => exit(code),
            Err(e) => {
                let code = e
                    .downcast_ref::<ZtpError>()
                    .map(ZtpError::exit_code)
                    .unwrap_or(SESSION_FAILURE_EXIT_CODE);
                eprintln!("{} {}", "Error:".red().bold(), e);
                eprintln!("return code {}", code);
                exit(code);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<i32> {
        let code = match &self.cli.command {
            Commands::Init { path, force } => InitCommand::new(path.clone(), *force).execute()?,
            Commands::Run {
                definition,
                session,
            } => {
                let config = self.agent_config(session)?;
                RunCommand::new(definition.clone(), config, session.format)
                    .execute()
                    .await?
            }
            Commands::AddConfig { url, vars, session } => {
                let config = self.agent_config(session)?;
                let variables = parse_variables(vars)?;
                AddConfigCommand::new(url.clone(), variables, config, session.format)
                    .execute()
                    .await?
            }
            Commands::Render { template, vars } => {
                let variables = parse_variables(vars)?;
                RenderCommand::new(template.clone(), variables).execute().await?
            }
        };
        Ok(code)
    }

    /// Load the agent config and apply command-line overrides
    fn agent_config(&self, args: &SessionArgs) -> ZtpResult<AgentConfig> {
        let mut config = AgentConfigStore::new().load_or_default(self.cli.config.as_deref())?;

        if let Some(server) = &args.server {
            config = config.with_server(server.as_str());
        }
        if let Some(output) = &args.output {
            config = config.with_startup_config(output.clone());
        }
        if let Some(policy) = args.on_failure {
            config = config.with_on_failure(policy);
        }
        if let Some(prefetch) = args.prefetch {
            config = config.with_prefetch(prefetch);
        }
        if let Some(backups) = args.backups {
            config = config.with_backups(backups);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse repeated `NAME=VALUE` arguments; a repeated name keeps the last value
pub fn parse_variables(raw: &[String]) -> ZtpResult<VariableMap> {
    let mut variables = VariableMap::with_capacity(raw.len());
    for item in raw {
        let (name, value) = item
            .split_once('=')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_validation_error("var", format!("expected NAME=VALUE, got '{}'", item))?;
        variables.insert(name.trim().to_string(), value.to_string());
    }
    Ok(variables)
}
