//! [`CsvStore`]: the CSV-file implementation of [`CampaignStore`].

use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use roster_core::{
  Error as CoreError,
  campaign::{DEFAULT_CAMPAIGN, Registry, file_stem},
  record::{Record, timestamp_now},
  store::{CampaignStore, Modified, Snapshot},
  version::{content_version, version_matches},
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{decode_records, encode_records},
  schema::{EXTENSION, REGISTRY_FILE},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A campaign store backed by a directory of CSV files.
///
/// Every write (registry or dataset) happens under one async mutex and lands
/// via write-to-temp-then-rename, so readers see either the old or the new
/// file. Cloning is cheap; clones share the mutex.
#[derive(Clone)]
pub struct CsvStore {
  dir:              PathBuf,
  default_campaign: String,
  write_lock:       Arc<Mutex<()>>,
}

impl CsvStore {
  /// Open (or create) a store rooted at `dir`.
  pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref().to_path_buf();
    fs::create_dir_all(&dir).await.map_err(write_error(&dir))?;
    Ok(Self {
      dir,
      default_campaign: DEFAULT_CAMPAIGN.to_owned(),
      write_lock: Arc::new(Mutex::new(())),
    })
  }

  /// Name used to seed an empty registry.
  pub fn with_default_campaign(mut self, name: impl Into<String>) -> Self {
    self.default_campaign = name.into();
    self
  }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Path of the dataset file for `campaign`.
  pub fn campaign_path(&self, campaign: &str) -> PathBuf {
    self.dir.join(format!("{}.{EXTENSION}", file_stem(campaign)))
  }

  pub fn registry_path(&self) -> PathBuf { self.dir.join(REGISTRY_FILE) }

  // ── Registry helpers (caller holds the write lock) ────────────────────────

  async fn read_registry(&self) -> Result<Registry> {
    let path = self.registry_path();
    match fs::read_to_string(&path).await {
      Ok(text) => Ok(Registry::from_lines(text.lines())),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Registry::default()),
      Err(e) => Err(read_error(&path)(e)),
    }
  }

  /// Read the registry, seeding and persisting the default campaign if it is
  /// empty.
  async fn read_registry_seeded(&self) -> Result<Registry> {
    let mut registry = self.read_registry().await?;
    if registry.ensure_default(&self.default_campaign) {
      info!(campaign = %self.default_campaign, "seeding empty campaign registry");
      self.write_registry(&registry).await?;
    }
    Ok(registry)
  }

  async fn write_registry(&self, registry: &Registry) -> Result<()> {
    write_atomic(&self.registry_path(), registry.to_text().as_bytes()).await
  }

  // ── Dataset helpers ───────────────────────────────────────────────────────

  /// Read and decode a dataset; `None` if the file does not exist. The
  /// version is taken from the bytes on disk, before any backfill.
  async fn read_existing(&self, path: &Path) -> Result<Option<Snapshot>> {
    let bytes = match fs::read(path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(read_error(path)(e)),
    };
    let records = decode_records(&bytes, &timestamp_now()).map_err(read_error(path))?;
    debug!(path = %path.display(), records = records.len(), "loaded campaign file");
    Ok(Some(Snapshot { records, version: content_version(&bytes) }))
  }

  /// Like [`Self::read_existing`], but creates an empty dataset file when
  /// there is none. Caller holds the write lock.
  async fn read_or_create(&self, path: &Path) -> Result<Snapshot> {
    if let Some(snapshot) = self.read_existing(path).await? {
      return Ok(snapshot);
    }
    info!(path = %path.display(), "creating empty campaign file");
    let version = self.write_records(path, &[]).await?;
    Ok(Snapshot { records: Vec::new(), version })
  }

  async fn write_records(&self, path: &Path, records: &[Record]) -> Result<String> {
    let bytes = encode_records(records).map_err(write_error(path))?;
    write_atomic(path, &bytes).await?;
    debug!(path = %path.display(), records = records.len(), "saved campaign file");
    Ok(content_version(&bytes))
  }
}

// ─── CampaignStore impl ──────────────────────────────────────────────────────

impl CampaignStore for CsvStore {
  type Error = Error;

  // ── Registry ──────────────────────────────────────────────────────────────

  async fn list_campaigns(&self) -> Result<Vec<String>> {
    let _guard = self.write_lock.lock().await;
    Ok(self.read_registry_seeded().await?.into_names())
  }

  async fn add_campaign<'a>(&'a self, name: &'a str) -> Result<String> {
    let _guard = self.write_lock.lock().await;
    let mut registry = self.read_registry_seeded().await?;
    let name = registry.add(name)?;

    // Dataset first: a registered campaign always has a file.
    self.write_records(&self.campaign_path(&name), &[]).await?;
    self.write_registry(&registry).await?;
    info!(campaign = %name, "campaign added");
    Ok(name)
  }

  async fn remove_campaign<'a>(&'a self, name: &'a str) -> Result<()> {
    let _guard = self.write_lock.lock().await;
    let mut registry = self.read_registry_seeded().await?;
    registry.remove(name)?;
    self.write_registry(&registry).await?;

    let path = self.campaign_path(name);
    match fs::remove_file(&path).await {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(write_error(&path)(e)),
    }
    info!(campaign = %name, "campaign removed");
    Ok(())
  }

  // ── Datasets ──────────────────────────────────────────────────────────────

  async fn load<'a>(&'a self, campaign: &'a str) -> Result<Snapshot> {
    let path = self.campaign_path(campaign);
    if let Some(snapshot) = self.read_existing(&path).await? {
      return Ok(snapshot);
    }
    // Re-check under the lock so a concurrent save is never clobbered by
    // the empty file.
    let _guard = self.write_lock.lock().await;
    self.read_or_create(&path).await
  }

  async fn save<'a>(&'a self, campaign: &'a str, records: Vec<Record>) -> Result<String> {
    let _guard = self.write_lock.lock().await;
    self.write_records(&self.campaign_path(campaign), &records).await
  }

  async fn modify<'a, F, T>(
    &'a self,
    campaign: &'a str,
    if_match: Option<&'a str>,
    transform: F,
  ) -> Result<Modified<T>>
  where
    F: FnOnce(Vec<Record>) -> roster_core::Result<(Vec<Record>, T)> + Send + 'a,
    T: Send + 'a,
  {
    let _guard = self.write_lock.lock().await;
    if !self.read_registry_seeded().await?.contains(campaign) {
      return Err(CoreError::UnknownCampaign(campaign.to_owned()).into());
    }
    let path = self.campaign_path(campaign);
    let Snapshot { records, version: actual } = self.read_or_create(&path).await?;

    if let Some(expected) = if_match
      && !version_matches(expected, &actual)
    {
      return Err(Error::Core(CoreError::VersionConflict {
        expected: expected.trim().trim_matches('"').to_owned(),
        actual,
      }));
    }

    let (records, output) = transform(records)?;
    let version = self.write_records(&path, &records).await?;
    Ok(Modified { output, version })
  }
}

// ─── File helpers ────────────────────────────────────────────────────────────

/// Replace `path` with `bytes` by writing a hidden sibling and renaming it
/// over the target.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

  let written = match fs::write(&tmp, bytes).await {
    Ok(()) => fs::rename(&tmp, path).await,
    Err(e) => Err(e),
  };
  if let Err(e) = written {
    // Covers a partial write as well as a failed rename.
    fs::remove_file(&tmp).await.ok();
    return Err(write_error(path)(e));
  }
  Ok(())
}

fn read_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
  move |source| {
    error!(path = %path.display(), error = %source, "failed to read campaign storage");
    Error::StorageRead { path: path.to_path_buf(), source }
  }
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
  move |source| {
    error!(path = %path.display(), error = %source, "failed to write campaign storage");
    Error::StorageWrite { path: path.to_path_buf(), source }
  }
}
