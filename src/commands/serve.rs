//! Serve command - Starts the HTTP server.

use crate::app::Application;
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::AppResult;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let config = apply_overrides(args, config);
    tracing::debug!(?config, "Effective configuration");

    Application::build(config).await?.run_until_stopped().await
}

/// Command-line flags win over the environment.
fn apply_overrides(args: ServeArgs, mut config: Config) -> Config {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    config
}
