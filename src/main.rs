//! framefeed - batch image-to-video import driven through a Chrome tab.
//!
//! Main entry point for the framefeed CLI.

mod cli;
mod cmd_batch;
mod cmd_run;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use framefeed_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging.resolved_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("framefeed")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit; must outlive every log call.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    // RUST_LOG wins over the configured level.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    info!("framefeed v{}", env!("CARGO_PKG_VERSION"));

    let store = cmd_batch::store_path(cli.store.as_deref(), &config);

    match cli.command {
        Commands::Inspect {
            archive,
            start_index,
        } => cmd_batch::inspect(&archive, start_index).await,
        Commands::Commit {
            archive,
            negative,
            start_index,
        } => {
            let queue = cmd_batch::open_queue(&store).await?;
            cmd_batch::commit(&config, &queue, &archive, negative.as_deref(), start_index).await?;
            Ok(())
        }
        Commands::Run { attach } => {
            let queue = cmd_batch::open_queue(&store).await?;
            cmd_run::run(&config, queue, attach).await
        }
        Commands::Import {
            archive,
            negative,
            start_index,
            attach,
        } => {
            let queue = cmd_batch::open_queue(&store).await?;
            cmd_batch::commit(&config, &queue, &archive, negative.as_deref(), start_index).await?;
            cmd_run::run(&config, queue, attach).await
        }
        Commands::Status { format } => {
            let queue = cmd_batch::open_queue(&store).await?;
            cmd_batch::status(&queue, &format).await
        }
        Commands::Clear => {
            let queue = cmd_batch::open_queue(&store).await?;
            cmd_batch::clear(&queue).await
        }
    }
}
