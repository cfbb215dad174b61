//! Error types for the import pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A logical column could not be matched to any source header. Raised
  /// before anything is written.
  #[error("required column '{0}' not found in source data")]
  MissingColumn(&'static str),

  #[error("source not found: {}", .0.display())]
  SourceMissing(PathBuf),

  #[error("invalid source table name {0:?}")]
  InvalidTableName(String),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("source database error: {0}")]
  Source(#[from] tokio_rusqlite::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
