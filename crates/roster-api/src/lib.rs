//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any
//! [`roster_core::store::CampaignStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! ```

pub mod campaigns;
pub mod error;
pub mod records;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, put},
};
use roster_core::store::CampaignStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CampaignStore + 'static,
{
  Router::new()
    // Campaigns
    .route("/campaigns", get(campaigns::list::<S>).post(campaigns::create::<S>))
    .route("/campaigns/{name}", delete(campaigns::remove::<S>))
    // Records
    .route(
      "/campaigns/{name}/records",
      get(records::list::<S>).post(records::create::<S>),
    )
    .route(
      "/campaigns/{name}/records/{national_id}",
      put(records::update::<S>).delete(records::remove::<S>),
    )
    .route("/campaigns/{name}/stats", get(records::stats::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
