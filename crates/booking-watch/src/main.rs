use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use booking_watch::{run_once, telemetry, BookingClient, Notifier, Settings, SnapshotStore};

#[derive(Parser)]
#[command(name = "booking-watch")]
#[command(about = "Check alteg.io for changed booking dates and notify once")]
struct Cli {
    /// Env file to load before reading settings.
    ///
    /// Defaults to `.env` in the working directory; a missing file is ignored.
    #[arg(long, value_name = "PATH", env = "BOOKING_WATCH_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    telemetry::init(telemetry::DEFAULT_FILTER);

    let settings = Settings::from_env();
    let store = SnapshotStore::from_settings(&settings).await;
    let notifier = Notifier::from_settings(&settings);
    let client = BookingClient::new(settings);

    let outcome = run_once(&client, &store, &notifier)
        .await
        .inspect_err(|e| tracing::error!("Run failed: {:?}", e))?;

    tracing::info!("{}", outcome);
    println!("{}", outcome);
    Ok(())
}
