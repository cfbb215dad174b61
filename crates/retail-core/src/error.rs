//! Error types for `retail-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date {0:?}: expected YYYY-MM-DD or DD.MM.YYYY")]
  InvalidDate(String),

  #[error("date range is inverted: {start} is after {end}")]
  InvertedRange {
    start: chrono::NaiveDate,
    end:   chrono::NaiveDate,
  },

  #[error("stock multiplier must be finite and non-negative, got {0}")]
  InvalidMultiplier(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
