//! Record types: one row of a campaign dataset.
//!
//! The serialised forms (status labels, timestamp format) are the ones found
//! in existing campaign spreadsheets, so files round-trip through external
//! tools unchanged.

use std::{fmt, str::FromStr};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format of [`Record::last_updated`]; local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
  Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Call-campaign status of a record.
///
/// The five named variants are the closed set the service writes. Values
/// read from disk that match none of them are kept verbatim in
/// [`Status::Unrecognized`] so a load/save cycle never rewrites them; they are
/// rejected on every write path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
  #[default]
  Pending,
  Called,
  Eligible,
  NotEligible,
  NoMessagingApp,
  Unrecognized(String),
}

impl Status {
  /// The closed set, in display order.
  pub const KNOWN: [Status; 5] = [
    Status::Pending,
    Status::Called,
    Status::Eligible,
    Status::NotEligible,
    Status::NoMessagingApp,
  ];

  /// The label stored in the `Estatus` column.
  pub fn label(&self) -> &str {
    match self {
      Self::Pending => "Pendiente",
      Self::Called => "Llamado",
      Self::Eligible => "Elegible",
      Self::NotEligible => "No Elegible",
      Self::NoMessagingApp => "No Tiene Whatsapp",
      Self::Unrecognized(raw) => raw,
    }
  }

  /// Parse a stored label or its English variant name. Returns `None` for
  /// anything outside the closed set.
  pub fn parse_known(s: &str) -> Option<Self> {
    let status = match s {
      "Pendiente" | "Pending" => Self::Pending,
      "Llamado" | "Called" => Self::Called,
      "Elegible" | "Eligible" => Self::Eligible,
      "No Elegible" | "NotEligible" => Self::NotEligible,
      "No Tiene Whatsapp" | "NoMessagingApp" => Self::NoMessagingApp,
      _ => return None,
    };
    Some(status)
  }

  pub fn is_known(&self) -> bool { !matches!(self, Self::Unrecognized(_)) }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl From<String> for Status {
  fn from(s: String) -> Self {
    Self::parse_known(&s).unwrap_or(Self::Unrecognized(s))
  }
}

impl From<&str> for Status {
  fn from(s: &str) -> Self {
    Self::parse_known(s).unwrap_or_else(|| Self::Unrecognized(s.to_owned()))
  }
}

impl From<Status> for String {
  fn from(s: Status) -> Self {
    match s {
      Status::Unrecognized(raw) => raw,
      known => known.label().to_owned(),
    }
  }
}

/// Strict parse used by write paths: only the closed set is accepted.
impl FromStr for Status {
  type Err = crate::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse_known(s.trim())
      .ok_or_else(|| crate::Error::InvalidStatus(s.to_owned()))
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One row of a campaign dataset. `national_id` is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  pub name:         String,
  pub national_id:  String,
  pub phone:        String,
  #[serde(default)]
  pub phone2:       String,
  #[serde(default)]
  pub status:       Status,
  #[serde(default)]
  pub comment:      String,
  #[serde(default)]
  pub last_updated: String,
}

// ─── NewRecord ───────────────────────────────────────────────────────────────

/// Input to [`crate::dataset::insert`]. Status, comment and timestamp are
/// always assigned by the insert itself and are not accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
  pub name:        String,
  pub national_id: String,
  pub phone:       String,
  #[serde(default)]
  pub phone2:      String,
}

impl From<Record> for NewRecord {
  fn from(r: Record) -> Self {
    Self {
      name:        r.name,
      national_id: r.national_id,
      phone:       r.phone,
      phone2:      r.phone2,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_and_english_names_parse_to_the_same_status() {
    for status in Status::KNOWN {
      assert_eq!(Status::from(status.label()), status);
    }
    assert_eq!(Status::from("NotEligible"), Status::NotEligible);
    assert_eq!(Status::from("NoMessagingApp"), Status::NoMessagingApp);
  }

  #[test]
  fn unknown_label_is_preserved_verbatim() {
    let status = Status::from("Volver a llamar");
    assert_eq!(status, Status::Unrecognized("Volver a llamar".into()));
    assert!(!status.is_known());
    assert_eq!(String::from(status), "Volver a llamar");
  }

  #[test]
  fn strict_parse_rejects_unknown_values() {
    assert_eq!("Llamado".parse::<Status>(), Ok(Status::Called));
    assert_eq!(" Eligible ".parse::<Status>(), Ok(Status::Eligible));
    assert_eq!(
      "".parse::<Status>(),
      Err(crate::Error::InvalidStatus(String::new()))
    );
  }

  #[test]
  fn status_serialises_as_its_label() {
    let json = serde_json::to_string(&Status::NoMessagingApp).unwrap();
    assert_eq!(json, "\"No Tiene Whatsapp\"");
    let back: Status = serde_json::from_str("\"Called\"").unwrap();
    assert_eq!(back, Status::Called);
  }

  #[test]
  fn timestamp_has_second_resolution() {
    let ts = timestamp_now();
    assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
  }
}
