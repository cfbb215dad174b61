//! Normalized entities produced by the import pipeline.
//!
//! Countries, categories and invoice lines receive store-assigned surrogate
//! keys; customers and invoices keep the identifiers found in the source;
//! products are numbered by the importer in first-seen order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Stored in place of a missing product description.
pub const NO_DESCRIPTION: &str = "No Description";

/// Initial stock per unit sold. Observed deployments used 1.0 and 1.5; this
/// crate ships 1.0 and lets configuration override it.
pub const DEFAULT_STOCK_MULTIPLIER: f64 = 1.0;

// ─── Reference data ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub country_id:   i64,
  pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  /// Taken verbatim from the source data.
  pub customer_id: i64,
  pub country_id:  i64,
}

impl Customer {
  /// The source carries no customer names; dashboards show this instead.
  pub fn display_name(customer_id: i64) -> String {
    format!("Customer {customer_id}")
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub product_id:  i64,
  pub stock_code:  String,
  pub description: String,
}

/// A category assignment, keyed by stock code rather than product id.
///
/// `stock_code` is a soft lookup key: it is unique in the category table but
/// not a foreign key into `product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
  pub category_name: String,
  pub stock_code:    String,
}

// ─── Transactions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub invoice_no:   String,
  pub invoice_date: NaiveDateTime,
  pub customer_id:  i64,
}

/// An invoice line before the store assigns its surrogate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoiceLine {
  pub invoice_no: String,
  pub product_id: i64,
  pub quantity:   i64,
  pub unit_price: f64,
}

impl NewInvoiceLine {
  pub fn line_total(&self) -> f64 { self.quantity as f64 * self.unit_price }
}

// ─── Stock ───────────────────────────────────────────────────────────────────

/// Multiplier applied to total units sold when seeding `stock`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StockMultiplier(f64);

impl StockMultiplier {
  pub fn new(value: f64) -> Result<Self> {
    if value.is_finite() && value >= 0.0 {
      Ok(Self(value))
    } else {
      Err(Error::InvalidMultiplier(value))
    }
  }

  pub fn get(self) -> f64 { self.0 }

  /// Initial stock for a product that sold `total_sold` units. Fractions are
  /// truncated toward zero.
  pub fn initial_stock(self, total_sold: i64) -> i64 {
    (total_sold as f64 * self.0).trunc() as i64
  }
}

impl Default for StockMultiplier {
  fn default() -> Self { Self(DEFAULT_STOCK_MULTIPLIER) }
}

impl TryFrom<f64> for StockMultiplier {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<StockMultiplier> for f64 {
  fn from(m: StockMultiplier) -> Self { m.0 }
}
