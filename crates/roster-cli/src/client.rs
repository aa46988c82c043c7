//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, Url};
use roster_core::{
  query::{RecordQuery, Stats},
  record::{NewRecord, Record},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

/// Connection settings for the roster API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Body of `GET /api/campaigns/:name/records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordList {
  pub campaign: String,
  pub query:    RecordQuery,
  pub records:  Vec<Record>,
  pub stats:    Stats,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server URL {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("server URL {:?} cannot be a base", config.base_url));
    }
    Ok(Self { client, base })
  }

  /// `<base>/api/<segments...>`, each segment percent-encoded.
  pub fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().push("api").extend(segments);
    }
    url
  }

  // ── Campaigns ─────────────────────────────────────────────────────────────

  /// `GET /api/campaigns`
  pub async fn list_campaigns(&self) -> Result<Vec<String>> {
    let resp = self
      .client
      .get(self.url(&["campaigns"]))
      .send()
      .await
      .context("GET /campaigns failed")?;
    decode(resp, "GET /campaigns").await
  }

  /// `POST /api/campaigns`
  pub async fn add_campaign(&self, name: &str) -> Result<String> {
    #[derive(Deserialize)]
    struct Created {
      name: String,
    }
    let resp = self
      .client
      .post(self.url(&["campaigns"]))
      .json(&json!({ "name": name }))
      .send()
      .await
      .context("POST /campaigns failed")?;
    let created: Created = decode(resp, "POST /campaigns").await?;
    Ok(created.name)
  }

  /// `DELETE /api/campaigns/:name`
  pub async fn remove_campaign(&self, name: &str) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&["campaigns", name]))
      .send()
      .await
      .context("DELETE /campaigns failed")?;
    expect_success(resp, "DELETE /campaigns").await
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /api/campaigns/:name/records[?query=..][&status=..]`
  pub async fn list_records(
    &self,
    campaign: &str,
    query: Option<&str>,
    status: Option<&str>,
  ) -> Result<RecordList> {
    let mut params = Vec::new();
    if let Some(q) = query {
      params.push(("query", q));
    }
    if let Some(s) = status {
      params.push(("status", s));
    }
    let resp = self
      .client
      .get(self.url(&["campaigns", campaign, "records"]))
      .query(&params)
      .send()
      .await
      .context("GET /records failed")?;
    decode(resp, "GET /records").await
  }

  /// `POST /api/campaigns/:name/records`
  pub async fn add_record(&self, campaign: &str, record: &NewRecord) -> Result<Record> {
    let resp = self
      .client
      .post(self.url(&["campaigns", campaign, "records"]))
      .json(record)
      .send()
      .await
      .context("POST /records failed")?;
    decode(resp, "POST /records").await
  }

  /// `PUT /api/campaigns/:name/records/:national_id`
  pub async fn update_record(
    &self,
    campaign: &str,
    national_id: &str,
    status: &str,
    comment: &str,
  ) -> Result<Record> {
    let resp = self
      .client
      .put(self.url(&["campaigns", campaign, "records", national_id]))
      .json(&json!({ "status": status, "comment": comment }))
      .send()
      .await
      .context("PUT /records failed")?;
    decode(resp, "PUT /records").await
  }

  /// `DELETE /api/campaigns/:name/records/:national_id`
  pub async fn delete_record(&self, campaign: &str, national_id: &str) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&["campaigns", campaign, "records", national_id]))
      .send()
      .await
      .context("DELETE /records failed")?;
    expect_success(resp, "DELETE /records").await
  }

  /// `GET /api/campaigns/:name/stats`
  pub async fn stats(&self, campaign: &str) -> Result<Stats> {
    let resp = self
      .client
      .get(self.url(&["campaigns", campaign, "stats"]))
      .send()
      .await
      .context("GET /stats failed")?;
    decode(resp, "GET /stats").await
  }
}

// ─── Response helpers ─────────────────────────────────────────────────────────

async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let resp = check(resp, what).await?;
  resp.json().await.with_context(|| format!("deserialising {what} response"))
}

async fn expect_success(resp: Response, what: &str) -> Result<()> {
  check(resp, what).await.map(|_| ())
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| status.to_string());
  Err(anyhow!("{what} → {status}: {message}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base: &str) -> ApiClient {
    ApiClient::new(ApiConfig { base_url: base.to_string() }).unwrap()
  }

  #[test]
  fn url_percent_encodes_campaign_names() {
    let c = client("http://localhost:5000");
    let url = c.url(&["campaigns", "Campaña Principal", "records"]);
    assert_eq!(
      url.as_str(),
      "http://localhost:5000/api/campaigns/Campa%C3%B1a%20Principal/records"
    );
  }

  #[test]
  fn url_keeps_base_path_prefix() {
    let c = client("http://host/roster/");
    assert_eq!(c.url(&["campaigns"]).as_str(), "http://host/roster/api/campaigns");
  }

  #[test]
  fn slashes_in_ids_stay_inside_one_segment() {
    let c = client("http://host");
    let url = c.url(&["campaigns", "a/b", "records", "V-1/2"]);
    assert_eq!(url.path(), "/api/campaigns/a%2Fb/records/V-1%2F2");
  }

  #[test]
  fn invalid_base_url_is_rejected() {
    assert!(ApiClient::new(ApiConfig { base_url: "not a url".into() }).is_err());
    assert!(ApiClient::new(ApiConfig { base_url: "mailto:x@y".into() }).is_err());
  }
}
