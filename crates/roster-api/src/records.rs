//! Handlers for `/campaigns/:name/records` and `/campaigns/:name/stats`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/campaigns/:name/records` | Optional `query`, `status`; stats cover the whole dataset |
//! | `POST`   | `/campaigns/:name/records` | Body: [`NewRecord`]; returns 201 + stored record |
//! | `PUT`    | `/campaigns/:name/records/:national_id` | Body: [`UpdateBody`] |
//! | `DELETE` | `/campaigns/:name/records/:national_id` | 204 |
//! | `GET`    | `/campaigns/:name/stats` | [`Stats`] only |
//!
//! Every response carries the dataset version as an `ETag`. Mutations accept
//! `If-Match` and answer 412 when the dataset has changed since.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use roster_core::{
  dataset,
  query::{RecordQuery, Stats, aggregate_stats},
  record::{NewRecord, Record, Status},
  store::CampaignStore,
};
use serde::{Deserialize, Serialize};

use crate::{campaigns::ensure_exists, error::ApiError};

fn etag(version: &str) -> [(header::HeaderName, String); 1] {
  [(header::ETAG, format!("\"{version}\""))]
}

/// The `If-Match` precondition, if any. A value that is not visible ASCII
/// can never match a version and is rejected outright.
fn if_match(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
  headers
    .get(header::IF_MATCH)
    .map(|v| {
      v.to_str()
        .map_err(|_| ApiError::BadRequest("If-Match is not a valid entity tag".to_owned()))
    })
    .transpose()
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Free-text search over name, national id, phones and comment.
  pub query:  Option<String>,
  /// Status label (or English variant name) to match exactly.
  pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordList {
  pub campaign: String,
  pub query:    RecordQuery,
  pub records:  Vec<Record>,
  /// Computed over the unfiltered dataset.
  pub stats:    Stats,
}

/// `GET /campaigns/:name/records[?query=...][&status=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(campaign): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  ensure_exists(store.as_ref(), &campaign).await?;
  let snapshot = store.load(&campaign).await.map_err(ApiError::from_store)?;

  let query = RecordQuery::from_params(params.query.as_deref(), params.status.as_deref());
  let records = query.apply(&snapshot.records);
  let stats = aggregate_stats(&snapshot.records);

  Ok((
    etag(&snapshot.version),
    Json(RecordList { campaign, query, records, stats }),
  ))
}

/// `GET /campaigns/:name/stats`
pub async fn stats<S>(
  State(store): State<Arc<S>>,
  Path(campaign): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  ensure_exists(store.as_ref(), &campaign).await?;
  let snapshot = store.load(&campaign).await.map_err(ApiError::from_store)?;
  Ok((etag(&snapshot.version), Json(aggregate_stats(&snapshot.records))))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /campaigns/:name/records`. Returns 201 + the stored [`Record`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(campaign): Path<String>,
  headers: HeaderMap,
  Json(body): Json<NewRecord>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  let modified = store
    .modify(&campaign, if_match(&headers)?, move |records| {
      let records = dataset::insert(records, body)?;
      let created = records.last().cloned();
      Ok((records, created))
    })
    .await
    .map_err(ApiError::from_store)?;

  let record = modified
    .output
    .ok_or_else(|| ApiError::NotFound("inserted record".to_owned()))?;
  tracing::info!(campaign = %campaign, national_id = %record.national_id, "record added");
  Ok((StatusCode::CREATED, etag(&modified.version), Json(record)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /campaigns/:name/records/:national_id`.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBody {
  /// One of the five status labels or their English variant names.
  pub status:  String,
  #[serde(default)]
  pub comment: String,
}

/// `PUT /campaigns/:name/records/:national_id`. Returns the updated record.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((campaign, national_id)): Path<(String, String)>,
  headers: HeaderMap,
  Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  let status: Status = body.status.parse()?;

  let id = national_id.clone();
  let modified = store
    .modify(&campaign, if_match(&headers)?, move |records| {
      let records = dataset::update(records, &id, status, &body.comment)?;
      let updated = dataset::find(&records, id.trim()).cloned();
      Ok((records, updated))
    })
    .await
    .map_err(ApiError::from_store)?;

  let record = modified
    .output
    .ok_or_else(|| ApiError::NotFound(format!("no record with national id {national_id}")))?;
  tracing::info!(campaign = %campaign, national_id = %record.national_id, status = %record.status, "record updated");
  Ok((etag(&modified.version), Json(record)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /campaigns/:name/records/:national_id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path((campaign, national_id)): Path<(String, String)>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
  S: CampaignStore,
{
  let id = national_id.clone();
  let modified = store
    .modify(&campaign, if_match(&headers)?, move |records| {
      Ok((dataset::delete(records, &id)?, ()))
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(campaign = %campaign, national_id = %national_id, "record deleted");
  Ok((StatusCode::NO_CONTENT, etag(&modified.version)))
}
