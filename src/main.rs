// certnotify - Certificate expiry notification job
// Licensed under GPL-3.0

use anyhow::{Context, Result};
use certnotify::NotifierConfig;
use certnotify::commands::{CheckCommand, Command};
use certnotify::config::LogConfig;
use certnotify::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env from the working directory; absence is normal
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: failed to load .env file: {}", e);
    }

    let log_guard =
        logging::init(&LogConfig::from_env()).context("Failed to initialize logging")?;

    let config = match NotifierConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("[Config Error] {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };

    CheckCommand::new(config).execute().await?;

    drop(log_guard);
    Ok(())
}
