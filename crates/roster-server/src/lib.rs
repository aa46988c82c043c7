//! HTTP server wiring for Roster.
//!
//! Loads [`ServerConfig`], opens the CSV store, and mounts
//! [`roster_api::api_router`] under `/api` with request tracing.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use roster_core::{campaign::DEFAULT_CAMPAIGN, store::CampaignStore};
use roster_store_csv::CsvStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  /// Directory holding the campaign files and the registry.
  #[serde(default = "default_data_dir")]
  pub data_dir:         PathBuf,
  /// Seeded into an empty registry.
  #[serde(default = "default_campaign")]
  pub default_campaign: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_data_dir() -> PathBuf { PathBuf::from("campaigns") }

fn default_campaign() -> String { DEFAULT_CAMPAIGN.to_string() }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      data_dir:         default_data_dir(),
      default_campaign: default_campaign(),
    }
  }
}

impl ServerConfig {
  /// Layer the (optional) TOML file at `path` under `ROSTER_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Open the store described by `config`, creating the data directory.
pub async fn open_store(config: &ServerConfig) -> roster_store_csv::Result<CsvStore> {
  let data_dir = expand_tilde(&config.data_dir);
  Ok(
    CsvStore::open(&data_dir)
      .await?
      .with_default_campaign(config.default_campaign.clone()),
  )
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the JSON API under `/api`, traced.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: CampaignStore + 'static,
{
  Router::new()
    .nest("/api", roster_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert!(!cfg.default_campaign.is_empty());
    assert!(!cfg.host.is_empty());
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "host = \"0.0.0.0\"\nport = 8080\ndata_dir = \"/srv/roster\"\ndefault_campaign = \"Inicio\"\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/srv/roster"));
    assert_eq!(cfg.default_campaign, "Inicio");
    assert_eq!(cfg.port, 8080);
  }

  #[test]
  fn expand_tilde_leaves_plain_paths_alone() {
    assert_eq!(expand_tilde(Path::new("data")), PathBuf::from("data"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x")), PathBuf::from(home).join("x"));
    }
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let dir = TempDir::new().unwrap();
    let cfg = ServerConfig {
      data_dir: dir.path().to_path_buf(),
      default_campaign: "Inicio".into(),
      ..ServerConfig::default()
    };
    let store = Arc::new(open_store(&cfg).await.unwrap());

    let req = Request::builder()
      .uri("/api/campaigns")
      .body(Body::empty())
      .unwrap();
    let resp = router(store.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let names: Vec<String> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(names, ["Inicio"]);

    let req = Request::builder().uri("/campaigns").body(Body::empty()).unwrap();
    let resp = router(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
