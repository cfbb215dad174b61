//! Entity extraction from the flat source rows.
//!
//! Each extractor walks the rows in source order, drops rows whose natural
//! key is null and keeps the first row seen for every key. Rows that fail
//! validation are logged at `warn` and counted in [`Extracted::skipped`].

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use retail_core::{
  category::CategoryTable,
  model::{Customer, Invoice, NO_DESCRIPTION, NewCategory, NewInvoiceLine, Product},
};
use tracing::warn;

use crate::{
  columns::{ColumnMap, LogicalColumn as Col, SourceRecord},
  source::SourceTable,
};

/// Rows that passed validation, plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
  pub rows:    Vec<T>,
  pub skipped: usize,
}

impl<T> Default for Extracted<T> {
  fn default() -> Self { Self { rows: Vec::new(), skipped: 0 } }
}

impl<T> Extracted<T> {
  fn skip(&mut self) { self.skipped += 1; }
}

/// `(1-based row number, record)` for every source row.
fn records<'a>(
  source: &'a SourceTable,
  columns: &'a ColumnMap,
) -> impl Iterator<Item = (usize, SourceRecord<'a>)> {
  source
    .rows()
    .iter()
    .enumerate()
    .map(move |(i, row)| (i + 1, columns.record(row)))
}

// ─── Reference data ──────────────────────────────────────────────────────────

/// Distinct country names in first-seen order.
pub fn countries(source: &SourceTable, columns: &ColumnMap) -> Vec<String> {
  let mut seen = HashSet::new();
  records(source, columns)
    .filter_map(|(_, r)| r.get(Col::Country))
    .filter(|name| seen.insert(*name))
    .map(String::from)
    .collect()
}

/// One customer per distinct id. The first row for an id decides its
/// country; customers whose country is null or unknown are skipped.
pub fn customers(
  source: &SourceTable,
  columns: &ColumnMap,
  country_ids: &HashMap<String, i64>,
) -> Extracted<Customer> {
  let mut seen = HashSet::new();
  let mut out = Extracted::default();

  for (row, record) in records(source, columns) {
    let Some(raw_id) = record.get(Col::CustomerId) else { continue };
    let Some(customer_id) = parse_integer(raw_id) else {
      warn!(row, customer_id = raw_id, "skipping customer with invalid id");
      out.skip();
      continue;
    };
    if !seen.insert(customer_id) {
      continue;
    }

    let country = record.get(Col::Country);
    match country.and_then(|name| country_ids.get(name)) {
      Some(&country_id) => out.rows.push(Customer { customer_id, country_id }),
      None => {
        warn!(row, customer_id, country = ?country, "skipping customer: missing country mapping");
        out.skip();
      }
    }
  }
  out
}

/// One product per distinct stock code, numbered from 1 in first-seen order.
pub fn products(source: &SourceTable, columns: &ColumnMap) -> Vec<Product> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();

  for (_, record) in records(source, columns) {
    let Some(stock_code) = record.get(Col::StockCode) else { continue };
    if !seen.insert(stock_code) {
      continue;
    }
    out.push(Product {
      product_id:  out.len() as i64 + 1,
      stock_code:  stock_code.to_owned(),
      description: record
        .get(Col::Description)
        .unwrap_or(NO_DESCRIPTION)
        .to_owned(),
    });
  }
  out
}

/// One category row per product, chosen by `table`.
pub fn categories(products: &[Product], table: &CategoryTable) -> Vec<NewCategory> {
  products
    .iter()
    .map(|p| NewCategory {
      category_name: table.classify(&p.description).to_owned(),
      stock_code:    p.stock_code.clone(),
    })
    .collect()
}

// ─── Transactions ────────────────────────────────────────────────────────────

/// One invoice per distinct invoice number, taken from its first row. The
/// invoice is skipped if that row's date is missing or unparsable, or if its
/// customer was not imported.
pub fn invoices(
  source: &SourceTable,
  columns: &ColumnMap,
  customers: &HashSet<i64>,
) -> Extracted<Invoice> {
  let mut seen = HashSet::new();
  let mut out = Extracted::default();

  for (row, record) in records(source, columns) {
    let Some(invoice_no) = record.get(Col::InvoiceNo) else { continue };
    if !seen.insert(invoice_no) {
      continue;
    }

    let Some(raw_date) = record.get(Col::InvoiceDate) else {
      warn!(row, invoice_no, "skipping invoice with no date");
      out.skip();
      continue;
    };
    let Some(invoice_date) = parse_invoice_date(raw_date) else {
      warn!(row, invoice_no, date = raw_date, "skipping invoice: invalid date format");
      out.skip();
      continue;
    };

    let raw_customer = record.get(Col::CustomerId);
    match raw_customer.and_then(parse_integer) {
      Some(customer_id) if customers.contains(&customer_id) => out.rows.push(Invoice {
        invoice_no: invoice_no.to_owned(),
        invoice_date,
        customer_id,
      }),
      _ => {
        warn!(row, invoice_no, customer_id = ?raw_customer, "skipping invoice: missing or invalid customer id");
        out.skip();
      }
    }
  }
  out
}

/// One line per row whose invoice and product were both imported.
pub fn invoice_lines(
  source: &SourceTable,
  columns: &ColumnMap,
  invoices: &HashSet<String>,
  product_ids: &HashMap<String, i64>,
) -> Extracted<NewInvoiceLine> {
  let mut out = Extracted::default();

  for (row, record) in records(source, columns) {
    let (Some(invoice_no), Some(stock_code), Some(raw_qty), Some(raw_price)) = (
      record.get(Col::InvoiceNo),
      record.get(Col::StockCode),
      record.get(Col::Quantity),
      record.get(Col::UnitPrice),
    ) else {
      warn!(row, "skipping invoice line with missing fields");
      out.skip();
      continue;
    };

    let (Some(quantity), Some(unit_price)) = (parse_quantity(raw_qty), parse_price(raw_price))
    else {
      warn!(row, quantity = raw_qty, unit_price = raw_price, "skipping invoice line: unparsable number");
      out.skip();
      continue;
    };

    match (invoices.contains(invoice_no), product_ids.get(stock_code)) {
      (true, Some(&product_id)) => out.rows.push(NewInvoiceLine {
        invoice_no: invoice_no.to_owned(),
        product_id,
        quantity,
        unit_price,
      }),
      _ => {
        warn!(row, invoice_no, stock_code, "skipping invoice line: missing invoice or product");
        out.skip();
      }
    }
  }
  out
}

// ─── Cell parsing ────────────────────────────────────────────────────────────

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%m/%d/%Y %H:%M",
  "%m/%d/%Y %H:%M:%S",
  "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parse an invoice timestamp; date-only values fall at midnight.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  DATETIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .or_else(|| {
      DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
    })
}

/// An integer, or a decimal with no fractional part (`17850.0`).
pub fn parse_integer(raw: &str) -> Option<i64> {
  let raw = raw.trim();
  raw.parse::<i64>().ok().or_else(|| {
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
  })
}

/// Quantities are integral; fractional values are truncated toward zero.
pub fn parse_quantity(raw: &str) -> Option<i64> {
  let raw = raw.trim();
  raw.parse::<i64>().ok().or_else(|| {
    let f = raw.parse::<f64>().ok()?;
    f.is_finite().then_some(f.trunc() as i64)
  })
}

pub fn parse_price(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}
