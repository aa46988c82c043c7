//! Error types for `roster-core`.

use thiserror::Error;

/// Validation failures raised by the pure registry and dataset operations.
///
/// Every variant is detected before anything is written, so an operation
/// that fails with one of these leaves persisted state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid campaign name: {0:?}")]
  InvalidName(String),

  #[error("campaign already exists: {0}")]
  DuplicateCampaign(String),

  #[error("campaign not found: {0}")]
  UnknownCampaign(String),

  #[error("cannot remove the last campaign: {0}")]
  LastCampaign(String),

  #[error("a record with national id {0} already exists")]
  DuplicateKey(String),

  #[error("no record with national id {0}")]
  NotFound(String),

  #[error("required field is empty: {0}")]
  MissingField(&'static str),

  #[error("unrecognised status: {0:?}")]
  InvalidStatus(String),

  #[error("dataset changed since version {expected} (now {actual})")]
  VersionConflict { expected: String, actual: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
