//! Core types and trait definitions for the Roster campaign store.
//!
//! No HTTP or file-system code lives here. Dataset operations are pure
//! functions over `Vec<Record>`; storage backends implement
//! [`store::CampaignStore`].

pub mod campaign;
pub mod dataset;
pub mod error;
pub mod query;
pub mod record;
pub mod store;
pub mod version;

pub use error::{Error, Result};
