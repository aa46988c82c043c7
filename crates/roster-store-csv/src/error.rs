//! Error type for `roster-store-csv`.

use std::path::PathBuf;

use roster_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("failed to read {}: {source}", path.display())]
  StorageRead {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  StorageWrite {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl StoreError for Error {
  fn validation(&self) -> Option<&roster_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      Self::StorageRead { .. } | Self::StorageWrite { .. } => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
