//! `roster`: command-line client for the roster server.
//!
//! # Usage
//!
//! ```text
//! roster campaigns list
//! roster campaigns add "Ventas Junio"
//! roster records "Campaña Principal" list --query ana --status Llamado
//! roster records "Campaña Principal" add --name Ana --national-id 1 --phone 555
//! roster records "Campaña Principal" update 1 --status Elegible --comment "ok"
//! roster stats "Campaña Principal"
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use roster_core::record::NewRecord;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Command-line client for the roster server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster server (default: http://localhost:5000).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  /// Print raw JSON instead of text.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage the campaign registry.
  Campaigns {
    #[command(subcommand)]
    action: Option<CampaignAction>,
  },
  /// Work with the records of one campaign.
  Records {
    campaign: String,
    #[command(subcommand)]
    action:   Option<RecordAction>,
  },
  /// Show status counts for one campaign.
  Stats { campaign: String },
}

#[derive(Subcommand, Debug)]
enum CampaignAction {
  List,
  Add { name: String },
  Rm { name: String },
}

#[derive(Subcommand, Debug)]
enum RecordAction {
  /// List records, optionally filtered.
  List {
    #[arg(short, long)]
    query:  Option<String>,
    #[arg(short, long)]
    status: Option<String>,
  },
  /// Add a record; it starts as Pendiente.
  Add {
    #[arg(long)]
    name:        String,
    #[arg(long)]
    national_id: String,
    #[arg(long)]
    phone:       String,
    #[arg(long, default_value = "")]
    phone2:      String,
  },
  /// Set the status and comment of a record.
  Update {
    national_id: String,
    #[arg(short, long)]
    status:      String,
    #[arg(short, long, default_value = "")]
    comment:     String,
  },
  Delete { national_id: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag, then config file, then [`DEFAULT_URL`].
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .filter(|u| !u.is_empty())
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let base_url = resolve_url(args.url, &file_cfg);
  tracing::debug!(%base_url, "using server");
  let client = ApiClient::new(ApiConfig { base_url })?;

  run(&client, args.command, args.json).await
}

async fn run(client: &ApiClient, command: Command, json: bool) -> Result<()> {
  match command {
    Command::Campaigns { action } => match action.unwrap_or(CampaignAction::List) {
      CampaignAction::List => {
        let names = client.list_campaigns().await?;
        emit(json, &names, || render::campaigns(&names))
      }
      CampaignAction::Add { name } => {
        let name = client.add_campaign(&name).await?;
        emit(json, &name, || format!("added {name}\n"))
      }
      CampaignAction::Rm { name } => {
        client.remove_campaign(&name).await?;
        emit(json, &name, || format!("removed {name}\n"))
      }
    },

    Command::Records { campaign, action } => {
      let action = action.unwrap_or(RecordAction::List { query: None, status: None });
      match action {
        RecordAction::List { query, status } => {
          let list = client
            .list_records(&campaign, query.as_deref(), status.as_deref())
            .await?;
          emit(json, &list, || render::records(&list.records))
        }
        RecordAction::Add { name, national_id, phone, phone2 } => {
          let new = NewRecord { name, national_id, phone, phone2 };
          let record = client.add_record(&campaign, &new).await?;
          emit(json, &record, || render::record(&record))
        }
        RecordAction::Update { national_id, status, comment } => {
          let record = client
            .update_record(&campaign, &national_id, &status, &comment)
            .await?;
          emit(json, &record, || render::record(&record))
        }
        RecordAction::Delete { national_id } => {
          client.delete_record(&campaign, &national_id).await?;
          emit(json, &national_id, || format!("deleted {national_id}\n"))
        }
      }
    }

    Command::Stats { campaign } => {
      let stats = client.stats(&campaign).await?;
      emit(json, &stats, || render::stats(&stats))
    }
  }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(value)?);
  } else {
    print!("{}", text());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flag_overrides_config_file_which_overrides_default() {
    let file = ConfigFile { url: "http://file:1".into() };
    assert_eq!(resolve_url(Some("http://flag:2".into()), &file), "http://flag:2");
    assert_eq!(resolve_url(None, &file), "http://file:1");
    assert_eq!(resolve_url(None, &ConfigFile::default()), DEFAULT_URL);
  }

  #[test]
  fn config_file_parses_url() {
    let cfg: ConfigFile = toml::from_str("url = \"http://h:9\"").unwrap();
    assert_eq!(cfg.url, "http://h:9");
  }

  #[test]
  fn records_subcommand_parses_filters() {
    let args = Args::try_parse_from([
      "roster", "records", "Campaña Principal", "list", "-q", "ana", "-s", "Llamado",
    ])
    .unwrap();
    match args.command {
      Command::Records { campaign, action: Some(RecordAction::List { query, status }) } => {
        assert_eq!(campaign, "Campaña Principal");
        assert_eq!(query.as_deref(), Some("ana"));
        assert_eq!(status.as_deref(), Some("Llamado"));
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn update_requires_status() {
    assert!(Args::try_parse_from(["roster", "records", "X", "update", "1"]).is_err());
    let args = Args::try_parse_from([
      "roster", "--json", "records", "X", "update", "1", "--status", "Elegible",
    ])
    .unwrap();
    assert!(args.json);
  }
}
