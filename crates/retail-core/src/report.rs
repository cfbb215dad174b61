//! Aggregate rows returned by dashboard queries.
//!
//! Every numeric field is a plain number; stores coalesce SQL `NULL`
//! aggregates to zero before building these.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filter::DateBounds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTrendPoint {
  pub date:        NaiveDate,
  pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
  pub product_id:   i64,
  pub stock_code:   String,
  pub product_name: String,
  pub revenue:      f64,
  pub quantity:     i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
  pub category: String,
  pub sales:    f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCustomers {
  pub country: String,
  pub count:   i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
  pub country: String,
  pub revenue: f64,
}

/// Order-level KPIs over a filtered set of invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMetrics {
  pub order_count:         i64,
  pub total_sales:         f64,
  pub average_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
  pub invoice_no:    String,
  pub invoice_date:  NaiveDateTime,
  pub customer_id:   i64,
  pub customer_name: String,
  pub country:       String,
  pub total_amount:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatCustomer {
  pub customer_id:   i64,
  pub customer_name: String,
  pub country:       String,
  pub orders:        i64,
  pub total_spent:   f64,
}

/// Severity shown next to a low-stock product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
  Critical,
  Low,
}

impl StockLevel {
  /// Below this many units a product is critical rather than merely low.
  pub const CRITICAL_BELOW: i64 = 5;

  pub fn for_quantity(quantity: i64) -> Self {
    if quantity < Self::CRITICAL_BELOW { Self::Critical } else { Self::Low }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
  pub product_id:        i64,
  pub stock_code:        String,
  pub product_name:      String,
  pub quantity_in_stock: i64,
  pub level:             StockLevel,
}

/// Row counts per destination table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
  pub country:      i64,
  pub customer:     i64,
  pub product:      i64,
  pub category:     i64,
  pub invoice:      i64,
  pub invoice_line: i64,
  pub stock:        i64,
}

/// Liveness snapshot served by `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
  pub counts:      TableCounts,
  pub date_range:  Option<DateBounds>,
  pub total_sales: f64,
}
