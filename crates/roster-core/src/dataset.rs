//! Mutations over a loaded campaign dataset.
//!
//! Each operation takes the dataset by value and returns the new one, so a
//! failed operation hands nothing back to be saved.

use crate::{
  Error, Result,
  record::{NewRecord, Record, Status, timestamp_now},
};

/// Whether any record carries `national_id`.
pub fn contains(records: &[Record], national_id: &str) -> bool {
  records.iter().any(|r| r.national_id == national_id)
}

/// Look up a record by key.
pub fn find<'a>(records: &'a [Record], national_id: &str) -> Option<&'a Record> {
  records.iter().find(|r| r.national_id == national_id)
}

/// Append a new record.
///
/// Inputs are trimmed; name, national id and phone are required. The new
/// record always starts as [`Status::Pending`] with an empty comment and a
/// fresh timestamp.
pub fn insert(
  mut records: Vec<Record>,
  new: impl Into<NewRecord>,
) -> Result<Vec<Record>> {
  let new = new.into();
  let name = required(&new.name, "name")?;
  let national_id = required(&new.national_id, "national_id")?;
  let phone = required(&new.phone, "phone")?;

  if contains(&records, &national_id) {
    return Err(Error::DuplicateKey(national_id));
  }

  records.push(Record {
    name,
    national_id,
    phone,
    phone2: new.phone2.trim().to_owned(),
    status: Status::Pending,
    comment: String::new(),
    last_updated: timestamp_now(),
  });
  Ok(records)
}

/// Set status and comment on the record(s) keyed by `national_id` and stamp
/// them with the current time. Identity fields are left untouched.
pub fn update(
  mut records: Vec<Record>,
  national_id: &str,
  status: Status,
  comment: &str,
) -> Result<Vec<Record>> {
  let national_id = national_id.trim();
  if !status.is_known() {
    return Err(Error::InvalidStatus(status.to_string()));
  }
  if !contains(&records, national_id) {
    return Err(Error::NotFound(national_id.to_owned()));
  }

  let now = timestamp_now();
  let comment = comment.trim();
  for record in records.iter_mut().filter(|r| r.national_id == national_id) {
    record.status = status.clone();
    record.comment = comment.to_owned();
    record.last_updated.clone_from(&now);
  }
  Ok(records)
}

/// Remove every record keyed by `national_id`.
pub fn delete(mut records: Vec<Record>, national_id: &str) -> Result<Vec<Record>> {
  let national_id = national_id.trim();
  if !contains(&records, national_id) {
    return Err(Error::NotFound(national_id.to_owned()));
  }
  records.retain(|r| r.national_id != national_id);
  Ok(records)
}

fn required(value: &str, field: &'static str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Error::MissingField(field));
  }
  Ok(value.to_owned())
}
