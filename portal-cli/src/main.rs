use anyhow::Context;
use clap::Parser;
use portal_cli::{telemetry, Cli};
use portal_core::gateway::HEALTH_PATH;
use portal_core::PortalConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PortalConfig::from_env().context("invalid PORTAL_* environment")?;
    if let Some(origin) = &cli.api_origin {
        config = config
            .with_api_origin(origin)
            .context("invalid --api-origin")?;
    }

    telemetry::init(&config.log_filter);
    tracing::debug!(health = %config.url(HEALTH_PATH), "using gateway");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    portal_cli::run(cli.command, &config, &mut out).await
}
