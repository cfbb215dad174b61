//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Invoice timestamps are stored as `YYYY-MM-DD HH:MM:SS` so that string
//! comparison orders them chronologically and `date()` can truncate them.

use chrono::{NaiveDate, NaiveDateTime};
use retail_core::{
  model::Customer,
  report::{InvoiceSummary, RepeatCustomer, SalesTrendPoint},
};

use crate::{Error, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_datetime(dt: NaiveDateTime) -> String {
  dt.format(DATETIME_FORMAT).to_string()
}

pub fn decode_datetime(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `sales_trend` row before its date is decoded.
pub struct RawTrendPoint {
  pub date:        String,
  pub total_sales: f64,
}

impl RawTrendPoint {
  pub fn into_point(self) -> Result<SalesTrendPoint> {
    Ok(SalesTrendPoint {
      date:        decode_date(&self.date)?,
      total_sales: self.total_sales,
    })
  }
}

/// A `recent_invoices` row before its timestamp is decoded.
pub struct RawInvoiceSummary {
  pub invoice_no:   String,
  pub invoice_date: String,
  pub customer_id:  i64,
  pub country:      String,
  pub total_amount: f64,
}

impl RawInvoiceSummary {
  pub fn into_summary(self) -> Result<InvoiceSummary> {
    Ok(InvoiceSummary {
      invoice_no:    self.invoice_no,
      invoice_date:  decode_datetime(&self.invoice_date)?,
      customer_id:   self.customer_id,
      customer_name: Customer::display_name(self.customer_id),
      country:       self.country,
      total_amount:  self.total_amount,
    })
  }
}

pub fn repeat_customer(
  customer_id: i64,
  country: String,
  orders: i64,
  total_spent: f64,
) -> RepeatCustomer {
  RepeatCustomer {
    customer_id,
    customer_name: Customer::display_name(customer_id),
    country,
    orders,
    total_spent,
  }
}
