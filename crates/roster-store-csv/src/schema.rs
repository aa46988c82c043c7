//! On-disk layout of the data directory.
//!
//! Campaign files carry exactly these seven columns, in this order. The
//! headers match the spreadsheets the files are exchanged with; the English
//! aliases are accepted when reading.

/// Header row written to every campaign file.
pub const COLUMNS: [&str; 7] = [
  "Nombre",
  "Cedula",
  "Telefono",
  "Telefono2",
  "Estatus",
  "Comentario",
  "FechaActualizacion",
];

/// Alternative headers accepted on read, index-aligned with [`COLUMNS`].
pub const ALIASES: [&str; 7] = [
  "Name",
  "NationalId",
  "Phone",
  "Phone2",
  "Status",
  "Comment",
  "LastUpdated",
];

/// Index of the timestamp column; backfilled with the load time when absent.
pub const LAST_UPDATED: usize = 6;

/// Extension of campaign files.
pub const EXTENSION: &str = "csv";

/// Name of the registry file inside the data directory.
pub const REGISTRY_FILE: &str = "lista_campañas.txt";
