//! roster-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the CSV
//! campaign store in `data_dir`, and serves the JSON API over HTTP.
//!
//! # Example configuration
//!
//! ```toml
//! host             = "127.0.0.1"
//! port             = 5000
//! data_dir         = "~/roster/campaigns"
//! default_campaign = "Campaña Principal"
//! ```
//!
//! Every key can be overridden with a `ROSTER_`-prefixed environment variable
//! (e.g. `ROSTER_PORT=8080`).

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_server::{ServerConfig, open_store};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roster campaign record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  let store = open_store(&server_cfg)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.data_dir))?;
  tracing::info!(data_dir = %store.dir().display(), "campaign store ready");

  let app = roster_server::router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
