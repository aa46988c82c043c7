//! Plain-text rendering of API responses.

use std::fmt::Write as _;

use roster_core::{
  query::Stats,
  record::{Record, Status},
};

/// One record per line, tab-separated, preceded by a header row.
pub fn records(records: &[Record]) -> String {
  let mut out = String::from("NAME\tNATIONAL_ID\tPHONE\tPHONE2\tSTATUS\tCOMMENT\tLAST_UPDATED\n");
  for r in records {
    let _ = writeln!(
      out,
      "{}\t{}\t{}\t{}\t{}\t{}\t{}",
      r.name, r.national_id, r.phone, r.phone2, r.status, r.comment, r.last_updated
    );
  }
  out
}

/// A single record as `key: value` lines.
pub fn record(r: &Record) -> String {
  format!(
    "name:         {}\nnational id:  {}\nphone:        {}\nphone 2:      {}\nstatus:       {}\ncomment:      {}\nlast updated: {}\n",
    r.name, r.national_id, r.phone, r.phone2, r.status, r.comment, r.last_updated
  )
}

/// `Total` followed by one line per known status label.
pub fn stats(stats: &Stats) -> String {
  let mut out = format!("Total\t{}\n", stats.total);
  for status in Status::KNOWN {
    let _ = writeln!(out, "{}\t{}", status.label(), stats.count(&status));
  }
  out
}

pub fn campaigns(names: &[String]) -> String {
  names.iter().map(|n| format!("{n}\n")).collect()
}
