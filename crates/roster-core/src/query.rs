//! Free-text search, status filtering and aggregate counts over a dataset.

use serde::{Deserialize, Serialize};

use crate::record::{Record, Status};

// ─── Query type ──────────────────────────────────────────────────────────────

/// A combined search: both filters must match. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
  /// Case-insensitive substring over name, national id, phones and comment.
  pub text:   Option<String>,
  /// Exact status match.
  pub status: Option<Status>,
}

impl RecordQuery {
  /// Build a query from raw request parameters; blank values mean "no
  /// filter".
  pub fn from_params(text: Option<&str>, status: Option<&str>) -> Self {
    let text = text
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned);
    let status = status
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(Status::from);
    Self { text, status }
  }

  pub fn matches(&self, record: &Record) -> bool {
    let text_ok = self
      .text
      .as_deref()
      .is_none_or(|t| matches_text(record, &t.to_lowercase()));
    let status_ok = self.status.as_ref().is_none_or(|s| record.status == *s);
    text_ok && status_ok
  }

  /// The matching records, in their original order.
  pub fn apply(&self, records: &[Record]) -> Vec<Record> {
    records.iter().filter(|r| self.matches(r)).cloned().collect()
  }
}

// ─── Individual filters ──────────────────────────────────────────────────────

/// Records whose name, national id, phone, phone2 or comment contains `text`,
/// ignoring case. An empty `text` matches everything.
pub fn search(records: &[Record], text: &str) -> Vec<Record> {
  if text.is_empty() {
    return records.to_vec();
  }
  let needle = text.to_lowercase();
  records
    .iter()
    .filter(|r| matches_text(r, &needle))
    .cloned()
    .collect()
}

/// Records whose status equals `status`; `None` matches everything.
pub fn filter_by_status(records: &[Record], status: Option<&Status>) -> Vec<Record> {
  match status {
    None => records.to_vec(),
    Some(s) => records.iter().filter(|r| r.status == *s).cloned().collect(),
  }
}

fn matches_text(record: &Record, needle: &str) -> bool {
  [
    &record.name,
    &record.national_id,
    &record.phone,
    &record.phone2,
    &record.comment,
  ]
  .iter()
  .any(|field| field.to_lowercase().contains(needle))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Record counts for a dataset. Records with an unrecognised status count
/// toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  pub total:            usize,
  pub pending:          usize,
  pub called:           usize,
  pub eligible:         usize,
  pub not_eligible:     usize,
  pub no_messaging_app: usize,
}

impl Stats {
  /// The bucket count for a status; `0` for unrecognised values.
  pub fn count(&self, status: &Status) -> usize {
    match status {
      Status::Pending => self.pending,
      Status::Called => self.called,
      Status::Eligible => self.eligible,
      Status::NotEligible => self.not_eligible,
      Status::NoMessagingApp => self.no_messaging_app,
      Status::Unrecognized(_) => 0,
    }
  }
}

pub fn aggregate_stats(records: &[Record]) -> Stats {
  let mut stats = Stats { total: records.len(), ..Stats::default() };
  for record in records {
    match record.status {
      Status::Pending => stats.pending += 1,
      Status::Called => stats.called += 1,
      Status::Eligible => stats.eligible += 1,
      Status::NotEligible => stats.not_eligible += 1,
      Status::NoMessagingApp => stats.no_messaging_app += 1,
      Status::Unrecognized(_) => {}
    }
  }
  stats
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(name: &str, id: &str, phone: &str, status: Status) -> Record {
    Record {
      name:         name.into(),
      national_id:  id.into(),
      phone:        phone.into(),
      phone2:       String::new(),
      status,
      comment:      String::new(),
      last_updated: String::new(),
    }
  }

  fn ana_and_luis() -> Vec<Record> {
    vec![
      record("Ana", "1", "555", Status::Pending),
      record("Luis", "2", "777", Status::Called),
    ]
  }

  #[test]
  fn search_is_case_insensitive() {
    let found = search(&ana_and_luis(), "ana");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Ana");

    let by_phone = search(&ana_and_luis(), "77");
    assert_eq!(by_phone[0].name, "Luis");
  }

  #[test]
  fn search_covers_comment_and_second_phone() {
    let mut records = ana_and_luis();
    records[0].comment = "Prefiere LLAMADAS en la tarde".into();
    records[1].phone2 = "0414-123".into();
    assert_eq!(search(&records, "llamadas")[0].name, "Ana");
    assert_eq!(search(&records, "0414")[0].name, "Luis");
  }

  #[test]
  fn empty_filters_return_everything_in_order() {
    let records = ana_and_luis();
    assert_eq!(search(&records, ""), records);
    assert_eq!(filter_by_status(&records, None), records);
    assert_eq!(RecordQuery::from_params(Some("  "), Some("")).apply(&records), records);
  }

  #[test]
  fn filter_by_status_matches_exactly() {
    let found = filter_by_status(&ana_and_luis(), Some(&Status::Called));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Luis");
  }

  #[test]
  fn combined_query_is_order_independent() {
    let mut records = ana_and_luis();
    records.push(record("Ana Luisa", "3", "999", Status::Called));

    let query = RecordQuery::from_params(Some("luis"), Some("Called"));
    let combined = query.apply(&records);
    let text_first = filter_by_status(&search(&records, "luis"), Some(&Status::Called));
    let status_first = search(&filter_by_status(&records, Some(&Status::Called)), "luis");

    assert_eq!(combined.len(), 2);
    assert_eq!(combined, text_first);
    assert_eq!(combined, status_first);
  }

  #[test]
  fn stats_for_ana_and_luis() {
    let stats = aggregate_stats(&ana_and_luis());
    assert_eq!(stats, Stats {
      total:            2,
      pending:          1,
      called:           1,
      eligible:         0,
      not_eligible:     0,
      no_messaging_app: 0,
    });
  }

  #[test]
  fn unrecognised_status_counts_in_total_only() {
    let mut records = ana_and_luis();
    records.push(record("Eva", "3", "111", Status::from("Ocupado")));
    let stats = aggregate_stats(&records);
    assert_eq!(stats.total, 3);
    let bucketed: usize = Status::KNOWN.iter().map(|s| stats.count(s)).sum();
    assert_eq!(bucketed, 2);
  }
}
