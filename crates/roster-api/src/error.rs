//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("precondition failed: {0}")]
  PreconditionFailed(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: validation failures keep their meaning,
  /// anything else is a storage fault.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.validation() {
      Some(v) => Self::from(v.clone()),
      None => Self::Store(Box::new(e)),
    }
  }
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self {
    use roster_core::Error as E;
    let message = e.to_string();
    match e {
      E::InvalidName(_) | E::MissingField(_) | E::InvalidStatus(_) => {
        Self::BadRequest(message)
      }
      E::UnknownCampaign(_) | E::NotFound(_) => Self::NotFound(message),
      E::DuplicateCampaign(_) | E::DuplicateKey(_) | E::LastCampaign(_) => {
        Self::Conflict(message)
      }
      E::VersionConflict { .. } => Self::PreconditionFailed(message),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::PreconditionFailed(m) => (StatusCode::PRECONDITION_FAILED, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
