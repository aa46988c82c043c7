//! Campaign names and the pure half of the campaign registry.
//!
//! A campaign is identified by its display name. Its dataset lives in a file
//! whose stem is derived from that name by [`file_stem`]. [`Registry`] holds
//! the ordered list of names and enforces the registry invariants; storage
//! backends load it, apply one operation, and write the whole list back.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name given to the campaign created when the registry is empty.
pub const DEFAULT_CAMPAIGN: &str = "Campaña Principal";

/// Derive the dataset file stem for a campaign name.
///
/// Keeps alphanumerics, space, hyphen and underscore, trims trailing
/// whitespace, then replaces spaces with underscores.
pub fn file_stem(name: &str) -> String {
  let kept: String = name
    .chars()
    .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
    .collect();
  kept.trim_end().replace(' ', "_")
}

/// Trim and validate a campaign name supplied by a caller.
pub fn normalize_name(raw: &str) -> Result<String> {
  let name = raw.trim();
  if name.is_empty() || name.chars().any(char::is_control) {
    return Err(Error::InvalidName(raw.to_owned()));
  }
  if file_stem(name).is_empty() {
    return Err(Error::InvalidName(raw.to_owned()));
  }
  Ok(name.to_owned())
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The ordered list of known campaign names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
  names: Vec<String>,
}

impl Registry {
  /// Build a registry from the lines of the persisted list. Blank lines are
  /// skipped and surrounding whitespace is dropped.
  pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
    let names = lines
      .into_iter()
      .map(str::trim)
      .filter(|l| !l.is_empty())
      .map(str::to_owned)
      .collect();
    Self { names }
  }

  /// The persisted form: one name per line.
  pub fn to_text(&self) -> String {
    self.names.iter().map(|n| format!("{n}\n")).collect()
  }

  pub fn names(&self) -> &[String] { &self.names }

  pub fn into_names(self) -> Vec<String> { self.names }

  pub fn is_empty(&self) -> bool { self.names.is_empty() }

  /// Exact, case-sensitive membership.
  pub fn contains(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  /// If the registry is empty, seed it with `default` and return `true`.
  pub fn ensure_default(&mut self, default: &str) -> bool {
    if !self.names.is_empty() {
      return false;
    }
    self.names.push(default.to_owned());
    true
  }

  /// Append a campaign; returns the normalised name that was stored.
  ///
  /// Besides exact duplicates, a name whose file stem matches an existing
  /// campaign's is rejected, since both would share one dataset file.
  pub fn add(&mut self, raw: &str) -> Result<String> {
    let name = normalize_name(raw)?;
    if self.contains(&name) {
      return Err(Error::DuplicateCampaign(name));
    }
    let stem = file_stem(&name);
    if self.names.iter().any(|n| file_stem(n) == stem) {
      return Err(Error::DuplicateCampaign(name));
    }
    self.names.push(name.clone());
    Ok(name)
  }

  /// Remove a campaign. The last remaining campaign cannot be removed.
  pub fn remove(&mut self, name: &str) -> Result<()> {
    let idx = self
      .names
      .iter()
      .position(|n| n == name)
      .ok_or_else(|| Error::UnknownCampaign(name.to_owned()))?;
    if self.names.len() <= 1 {
      return Err(Error::LastCampaign(name.to_owned()));
    }
    self.names.remove(idx);
    Ok(())
  }
}
