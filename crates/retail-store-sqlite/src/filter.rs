//! Composable WHERE-clause predicates over the shared sales join.
//!
//! Every sales query selects from [`SALES_FROM`], so a [`SalesFilter`] maps to
//! the same fixed set of predicates no matter which aggregate is asked for.

use chrono::Days;
use retail_core::filter::SalesFilter;
use rusqlite::types::Value;

use crate::encode::encode_date;

/// Label for lines whose product has no category row.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The join every sales aggregate runs over. Aliases: `l` invoice line,
/// `i` invoice, `c` customer, `co` country, `p` product, `cat` category.
pub const SALES_FROM: &str = "
  FROM invoice_line l
  JOIN invoice  i  ON i.invoice_no  = l.invoice_no
  JOIN customer c  ON c.customer_id = i.customer_id
  JOIN country  co ON co.country_id = c.country_id
  JOIN product  p  ON p.product_id  = l.product_id
  LEFT JOIN category cat ON cat.stock_code = p.stock_code";

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  /// Invoices on or after this day.
  Since(chrono::NaiveDate),
  /// Invoices on or before this day.
  Until(chrono::NaiveDate),
  Category(String),
  Country(String),
  /// Substring of product description or stock code, case-insensitive.
  Search(String),
}

impl Predicate {
  fn sql(&self) -> &'static str {
    match self {
      Predicate::Since(_)    => "i.invoice_date >= ?",
      Predicate::Until(_)    => "i.invoice_date < ?",
      Predicate::Category(_) => "COALESCE(cat.category_name, ?) = ?",
      Predicate::Country(_)  => "co.country_name = ?",
      Predicate::Search(_)   => {
        "(p.description LIKE ? ESCAPE '\\' OR p.stock_code LIKE ? ESCAPE '\\')"
      }
    }
  }

  fn bind(&self, params: &mut Vec<Value>) {
    match self {
      Predicate::Since(day) => params.push(Value::Text(encode_date(*day))),
      // Timestamps carry a time of day, so compare against the next midnight.
      Predicate::Until(day) => {
        let next = day.checked_add_days(Days::new(1)).unwrap_or(*day);
        params.push(Value::Text(encode_date(next)));
      }
      Predicate::Category(name) => {
        params.push(Value::Text(UNCATEGORIZED.to_owned()));
        params.push(Value::Text(name.clone()));
      }
      Predicate::Country(name) => params.push(Value::Text(name.clone())),
      Predicate::Search(text) => {
        let pattern = like_pattern(text);
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
      }
    }
  }
}

/// `%text%` with LIKE wildcards in `text` escaped.
fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for ch in text.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

/// The predicates derived from one [`SalesFilter`], in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicates(Vec<Predicate>);

impl From<&SalesFilter> for Predicates {
  fn from(filter: &SalesFilter) -> Self {
    let mut preds = Vec::new();
    if let Some(range) = filter.range {
      preds.push(Predicate::Since(range.start));
      preds.push(Predicate::Until(range.end));
    }
    if let Some(category) = &filter.category {
      preds.push(Predicate::Category(category.clone()));
    }
    if let Some(country) = &filter.country {
      preds.push(Predicate::Country(country.clone()));
    }
    if let Some(search) = &filter.search {
      preds.push(Predicate::Search(search.clone()));
    }
    Self(preds)
  }
}

impl Predicates {
  /// `WHERE a AND b ...`, or an empty string when unfiltered.
  pub fn where_clause(&self) -> String {
    if self.0.is_empty() {
      return String::new();
    }
    let conds: Vec<&str> = self.0.iter().map(Predicate::sql).collect();
    format!("WHERE {}", conds.join(" AND "))
  }

  /// Positional parameters matching [`Self::where_clause`].
  pub fn params(&self) -> Vec<Value> {
    let mut params = Vec::new();
    for pred in &self.0 {
      pred.bind(&mut params);
    }
    params
  }
}
