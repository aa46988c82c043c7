//! Handlers for `/campaigns` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/campaigns` | Registry order; seeds the default campaign when empty |
//! | `POST`   | `/campaigns` | Body: `{"name":"..."}`; 409 on duplicates |
//! | `DELETE` | `/campaigns/:name` | 409 for the last campaign |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::store::CampaignStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /campaigns`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: CampaignStore,
{
  let names = store.list_campaigns().await.map_err(ApiError::from_store)?;
  Ok(Json(names))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct CampaignBody {
  pub name: String,
}

/// `POST /campaigns`, body: `{"name":"Ventas"}`. Returns 201 + the stored
/// (trimmed) name.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CampaignBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  let name = store
    .add_campaign(&body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(CampaignBody { name })))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /campaigns/:name`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: CampaignStore,
{
  store
    .remove_campaign(&name)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// Fail with 404 unless `name` is a registered campaign.
pub(crate) async fn ensure_exists<S>(store: &S, name: &str) -> Result<(), ApiError>
where
  S: CampaignStore,
{
  let names = store.list_campaigns().await.map_err(ApiError::from_store)?;
  if names.iter().any(|n| n == name) {
    Ok(())
  } else {
    Err(roster_core::Error::UnknownCampaign(name.to_owned()).into())
  }
}
