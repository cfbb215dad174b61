//! Dashboard filters and the default date-window policy.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// An inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvertedRange { start, end });
    }
    Ok(Self { start, end })
  }

  pub fn single_day(day: NaiveDate) -> Self { Self { start: day, end: day } }

  pub fn contains(&self, day: NaiveDate) -> bool {
    self.start <= day && day <= self.end
  }
}

/// Earliest and latest invoice dates present in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
  pub min: NaiveDate,
  pub max: NaiveDate,
}

impl DateBounds {
  /// Resolve the range a dashboard should show.
  ///
  /// With no explicit bounds the window is the latest `window_days` days
  /// ending at `max`, clamped to `min`. A lone `start` runs to `max`; a lone
  /// `end` reaches back `window_days`. Explicit bounds are used as given.
  pub fn window(
    &self,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    window_days: u32,
  ) -> Result<DateRange> {
    let span = u64::from(window_days.max(1) - 1);
    match (start, end) {
      (Some(start), Some(end)) => DateRange::new(start, end),
      (Some(start), None) => DateRange::new(start, self.max.max(start)),
      (None, end) => {
        let end = end.unwrap_or(self.max);
        let start = end
          .checked_sub_days(Days::new(span))
          .unwrap_or(NaiveDate::MIN)
          .max(self.min)
          .min(end);
        DateRange::new(start, end)
      }
    }
  }
}

/// Parse a query-string date. Accepts `YYYY-MM-DD` and the `DD.MM.YYYY` form
/// some date pickers emit. Blank input means "not supplied".
pub fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
  let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return Ok(None);
  };
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
    .map(Some)
    .map_err(|_| Error::InvalidDate(raw.to_owned()))
}

// ─── Sales filter ────────────────────────────────────────────────────────────

/// Optional restrictions applied uniformly to every sales aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilter {
  pub range:    Option<DateRange>,
  pub category: Option<String>,
  pub country:  Option<String>,
  /// Substring matched against product description or stock code.
  pub search:   Option<String>,
}

impl SalesFilter {
  pub fn with_range(mut self, range: Option<DateRange>) -> Self {
    self.range = range;
    self
  }

  /// Set the category; blank values and `all` clear it.
  pub fn with_category(mut self, category: Option<String>) -> Self {
    self.category = non_blank(category).filter(|c| !c.eq_ignore_ascii_case("all"));
    self
  }

  pub fn with_country(mut self, country: Option<String>) -> Self {
    self.country = non_blank(country).filter(|c| !c.eq_ignore_ascii_case("all"));
    self
  }

  pub fn with_search(mut self, search: Option<String>) -> Self {
    self.search = non_blank(search);
    self
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
