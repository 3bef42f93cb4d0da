//! Service desk HTTP server.

use servicedesk::bootstrap;
use servicedesk::config::AppConfig;
use servicedesk::logging::init_tracing;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(err) = dotenv::dotenv() {
        // Running without a .env file is fine.
        if !err.not_found() {
            return Err(err.into());
        }
    }
    init_tracing()?;

    let config = AppConfig::from_env().inspect_err(|err| {
        error!(error = %err, "invalid configuration");
    })?;
    info!(port = config.port, "starting servicedesk");

    bootstrap::serve(config).await.inspect_err(|err| {
        error!(error = %err, "server stopped with an error");
    })?;
    Ok(())
}
