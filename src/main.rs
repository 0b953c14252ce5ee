use tracing_subscriber::EnvFilter;
use ztpboot::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = CliApp::new();

    // RUST_LOG wins over --verbose
    let default_level = if app.verbose() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    app.run().await
}
