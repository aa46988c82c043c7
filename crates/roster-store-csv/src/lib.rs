//! CSV backend for the Roster campaign store.
//!
//! One CSV file per campaign plus a line-oriented registry file, all in a
//! single data directory. File I/O goes through [`tokio::fs`] so the async
//! runtime is never blocked.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::{COLUMNS, EXTENSION, REGISTRY_FILE};
pub use store::CsvStore;

#[cfg(test)]
mod tests;
