//! Encoding and decoding between [`Record`] and campaign CSV bytes.
//!
//! Decoding is lenient about layout: columns are located by header (primary
//! or alias, any order), absent columns are backfilled, and short rows are
//! padded with empty cells. Encoding always writes the canonical layout.

use std::io;

use roster_core::record::{Record, Status};

use crate::schema::{ALIASES, COLUMNS, LAST_UPDATED};

// ─── Encode ──────────────────────────────────────────────────────────────────

/// Serialise records under the canonical header row.
pub fn encode_records(records: &[Record]) -> io::Result<Vec<u8>> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  writer.write_record(COLUMNS)?;
  for r in records {
    writer.write_record([
      r.name.as_str(),
      r.national_id.as_str(),
      r.phone.as_str(),
      r.phone2.as_str(),
      r.status.label(),
      r.comment.as_str(),
      r.last_updated.as_str(),
    ])?;
  }
  writer.into_inner().map_err(|e| e.into_error())
}

// ─── Decode ──────────────────────────────────────────────────────────────────

/// Parse campaign CSV bytes.
///
/// `now` fills the timestamp column when the file has none; every other
/// missing column reads as an empty string.
pub fn decode_records(bytes: &[u8], now: &str) -> io::Result<Vec<Record>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_reader(bytes);

  let headers = reader.headers()?.clone();
  let positions: Vec<Option<usize>> = (0..COLUMNS.len())
    .map(|col| {
      headers.iter().position(|h| {
        let h = h.trim_start_matches('\u{feff}').trim();
        h == COLUMNS[col] || h == ALIASES[col]
      })
    })
    .collect();

  let mut records = Vec::new();
  for row in reader.records() {
    let row = row?;
    let cell = |col: usize| -> String {
      match positions[col] {
        Some(idx) => row.get(idx).unwrap_or_default().to_owned(),
        None if col == LAST_UPDATED => now.to_owned(),
        None => String::new(),
      }
    };
    records.push(Record {
      name:         cell(0),
      national_id:  cell(1),
      phone:        cell(2),
      phone2:       cell(3),
      status:       Status::from(cell(4)),
      comment:      cell(5),
      last_updated: cell(LAST_UPDATED),
    });
  }
  Ok(records)
}
