use anyhow::{Context, Result};
use clap::Parser;
use resume_tailor::cli::{handle_command, Cli};
use resume_tailor::AppConfig;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(json: bool, log_file: Option<&Path>) -> Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resume_tailor=info,rocket::server=off"));

    if json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer))
            .with(filter)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, source) = AppConfig::load()?;
    init_logging(cli.json_logs, config.log_file.as_deref())?;
    info!("{}", source);

    info!(
        "resume-tailor {} (model {}, database {})",
        env!("CARGO_PKG_VERSION"),
        config.ai.model,
        config.storage.database_path.display()
    );

    handle_command(cli, config).await
}
