//! Loading the flat source table.
//!
//! Whatever the origin, a [`SourceTable`] is a header row plus text cells.
//! Blank cells are `None`; numeric database cells are rendered in their
//! shortest decimal form, so `17850.0` arrives as `"17850"`.

use std::{io::Read, path::Path};

use rusqlite::{OpenFlags, types::ValueRef};
use tracing::info;

use crate::{Error, Result};

/// Default name of the wide sales table in a source database.
pub const DEFAULT_SOURCE_TABLE: &str = "online_retail_source";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
  headers: Vec<String>,
  rows:    Vec<Vec<Option<String>>>,
}

impl SourceTable {
  pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
    Self { headers, rows }
  }

  pub fn headers(&self) -> &[String] { &self.headers }

  pub fn rows(&self) -> &[Vec<Option<String>>] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Read a CSV document with a header row. Rows may be ragged; missing
  /// trailing cells read as `None`.
  pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
    let mut csv_reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .flexible(true)
      .trim(csv::Trim::All)
      .from_reader(reader);

    let headers = csv_reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in csv_reader.records() {
      let record = record?;
      rows.push(record.iter().map(normalize).collect());
    }
    Ok(Self { headers, rows })
  }

  pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(Error::SourceMissing(path.to_path_buf()));
    }
    let table = Self::from_csv_reader(std::fs::File::open(path).map_err(csv::Error::from)?)?;
    info!(path = %path.display(), rows = table.len(), "read CSV source");
    Ok(table)
  }

  /// Read every row of `table` from the SQLite database at `path`. The
  /// database is opened read-only.
  pub async fn from_sqlite(path: impl AsRef<Path>, table: &str) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(Error::SourceMissing(path.to_path_buf()));
    }
    let sql = format!("SELECT * FROM {}", quote_identifier(table)?);

    let conn =
      tokio_rusqlite::Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .await?;
    let source = conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let headers: Vec<String> =
          stmt.column_names().into_iter().map(String::from).collect();
        let width = headers.len();
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get_ref(i).map(cell_text))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(SourceTable { headers, rows })
      })
      .await?;

    info!(table, rows = source.len(), "read source table");
    Ok(source)
  }
}

/// Trimmed text, or `None` when nothing is left.
pub(crate) fn normalize(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
  match value {
    ValueRef::Null => None,
    ValueRef::Integer(i) => Some(i.to_string()),
    // `Display` for f64 prints the shortest round-tripping form without a
    // trailing `.0`.
    ValueRef::Real(f) => Some(f.to_string()),
    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => normalize(&String::from_utf8_lossy(bytes)),
  }
}

fn quote_identifier(name: &str) -> Result<String> {
  if name.trim().is_empty() || name.contains('\0') {
    return Err(Error::InvalidTableName(name.to_owned()));
  }
  Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}
