use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homework_bot::api::PracticumClient;
use homework_bot::config::{self, ConfigError};
use homework_bot::notifier::TelegramMessenger;
use homework_bot::poller::Poller;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML settings file (credentials always come from the environment)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single check and exit instead of polling forever
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let cfg = match config::load(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err @ ConfigError::MissingCredential(_)) => {
            error!(%err, "required credentials are missing, refusing to start");
            return Err(err.into());
        }
        Err(err) => {
            error!(%err, "failed to load configuration");
            return Err(err.into());
        }
    };

    let source = PracticumClient::new(&cfg.settings.endpoint, cfg.credentials.practicum_token.clone())?;
    let messenger = TelegramMessenger::new(&cfg.credentials.telegram_token);
    let mut poller = Poller::new(
        Box::new(source),
        Box::new(messenger),
        cfg.credentials.telegram_chat_id.clone(),
        Duration::from_secs(cfg.settings.retry_interval_secs),
        cfg.settings.from_date,
    );

    info!(
        endpoint = %cfg.settings.endpoint,
        cursor = poller.cursor(),
        interval_secs = poller.interval().as_secs(),
        "starting homework bot"
    );

    if args.once {
        poller.tick().await;
        return Ok(());
    }

    poller
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(?err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
