//! The `CampaignStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-csv`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::record::Record;

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// A dataset as read at one moment, tagged with its content version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
  pub records: Vec<Record>,
  /// See [`crate::version::content_version`].
  pub version: String,
}

/// The outcome of [`CampaignStore::modify`]: whatever the transform chose to
/// return alongside the version that was written.
#[derive(Debug, Clone)]
pub struct Modified<T> {
  pub output:  T,
  pub version: String,
}

// ─── Error classification ────────────────────────────────────────────────────

/// Backend errors either wrap a validation [`crate::Error`] or report a
/// storage failure. Callers use [`StoreError::validation`] to tell them apart.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The validation failure behind this error, if it is one.
  fn validation(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a campaign store backend.
///
/// Datasets are never cached between calls: every read goes to storage and
/// every write replaces the whole campaign.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CampaignStore: Send + Sync {
  type Error: StoreError;

  // ── Registry ──────────────────────────────────────────────────────────

  /// The ordered campaign names. An empty or missing registry is seeded with
  /// the default campaign, and that seed is persisted before returning.
  fn list_campaigns(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Register a campaign and create its empty dataset. Returns the stored
  /// (trimmed) name.
  fn add_campaign<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Unregister a campaign and delete its dataset. Fails for the last
  /// remaining campaign.
  fn remove_campaign<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Datasets ──────────────────────────────────────────────────────────

  /// Read a campaign's dataset, creating an empty one if it does not exist.
  fn load<'a>(
    &'a self,
    campaign: &'a str,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + 'a;

  /// Overwrite a campaign's dataset. Returns the version written.
  fn save<'a>(
    &'a self,
    campaign: &'a str,
    records: Vec<Record>,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Load, transform and save a dataset as one step with respect to other
  /// writers on this store.
  ///
  /// Fails with [`crate::Error::UnknownCampaign`] unless `campaign` is
  /// registered; the check happens under the same exclusion as the write.
  ///
  /// - `if_match`: if set, fail with [`crate::Error::VersionConflict`] unless
  ///   the loaded dataset still has this version.
  /// - `transform`: returns the new dataset and a value handed back to the
  ///   caller. If it fails, nothing is written.
  fn modify<'a, F, T>(
    &'a self,
    campaign: &'a str,
    if_match: Option<&'a str>,
    transform: F,
  ) -> impl Future<Output = Result<Modified<T>, Self::Error>> + Send + 'a
  where
    F: FnOnce(Vec<Record>) -> crate::Result<(Vec<Record>, T)> + Send + 'a,
    T: Send + 'a;
}
