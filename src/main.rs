mod app;
mod checklist;
mod commands;
mod config;
mod state;
mod storage;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::Command;
use config::StorageBackend;
use storage::{FileStore, KeyValueStore, MemoryStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "checkmind")]
#[command(about = "A local-first checklist manager for the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/checkmind/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  let _guard = init_tracing(&config)?;

  let data_dir = config.storage.data_dir.clone();
  match config.storage.backend {
    StorageBackend::File => run(FileStore::open(data_dir)?, args.command).await,
    StorageBackend::Sqlite => run(SqliteStore::open(data_dir)?, args.command).await,
    StorageBackend::Memory => run(MemoryStore::new(), args.command).await,
  }
}

async fn run<S: KeyValueStore + 'static>(store: S, command: Command) -> Result<()> {
  let mut app = app::App::new(store).await?;
  app.run(command).await
}

/// Route logs to a file in the data directory, keeping stdout clean for
/// command output.
fn init_tracing(config: &config::Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let dir = storage::data_dir(config.storage.data_dir.clone())?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create data directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, "checkmind.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("checkmind=info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
