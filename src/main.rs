use anyhow::Result;
use cleanlink::{config, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using environment variables");
    }

    let config = config::load_from_env()?;
    let _log_guard = telemetry::init_tracing(&config)?;
    config.print_summary();

    server::run(config).await
}
