mod api;
mod app;
mod assistant;
mod cache;
mod commands;
mod config;
mod event;
mod forms;
mod query;
mod service;
mod storage;
mod text;
mod theme;
mod ui;
mod validation;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "joblo")]
#[command(about = "A terminal job board with an AI job assistant")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/joblo/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Path to the durable store (default: $XDG_DATA_HOME/joblo/storage.db)
  #[arg(short, long)]
  storage: Option<PathBuf>,

  /// Probability in [0, 1] that a simulated call fails
  #[arg(long, value_parser = config::parse_failure_rate)]
  failure_rate: Option<f64>,

  /// Answer simulated calls immediately
  #[arg(long)]
  no_latency: bool,
}

/// Log to a daily file; the terminal belongs to the UI
fn init_logging() -> Result<WorkerGuard> {
  let log_dir = config::data_dir()?.join("logs");
  std::fs::create_dir_all(&log_dir)?;

  let appender = tracing_appender::rolling::daily(log_dir, "joblo.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("joblo=info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line wins over the file
  if let Some(path) = args.storage {
    config.storage_path = Some(path);
  }
  if let Some(rate) = args.failure_rate {
    config.service.failure_rate = rate;
  }
  if args.no_latency {
    config.service.latency = false;
  }

  let store = Arc::new(storage::SqliteStore::open(&config.storage_path()?)?);
  info!(title = config.title(), "Starting");

  // Initialize and run the app
  let mut events = event::EventHandler::new(Duration::from_millis(250));
  let mut app = app::App::new(&config, store, events.sender());
  app.run(&mut events).await?;

  Ok(())
}
