//! [`SqliteStore`], the SQLite implementation of [`RetailStore`].

use std::path::Path;

use chrono::NaiveDate;
use retail_core::{
  filter::{DateBounds, SalesFilter},
  model::{Country, Customer, Invoice, NewCategory, NewInvoiceLine, Product, StockMultiplier},
  report::{
    CategorySales, CountryCustomers, CountryRevenue, InvoiceSummary, OrderMetrics,
    ProductRevenue, RepeatCustomer, SalesTrendPoint, StockAlert, TableCounts,
  },
  store::RetailStore,
};
use tracing::debug;

use crate::{
  Result,
  encode::{RawInvoiceSummary, RawTrendPoint, decode_date},
  load, query,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A retail analytics store backed by a single SQLite file.
///
/// Cloning shares the inner reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, creating the schema if absent.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Drop every table and recreate the empty schema.
  pub async fn reset(&self) -> Result<()> {
    self
      .conn
      .call(|conn| Ok(load::reset(conn)?))
      .await?;
    Ok(())
  }

  async fn names(&self, sql: &'static str) -> Result<Vec<String>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::distinct_names(conn, sql)?))
        .await?,
    )
  }
}

// ─── RetailStore impl ────────────────────────────────────────────────────────

impl RetailStore for SqliteStore {
  type Error = crate::Error;

  // ── Import phases ─────────────────────────────────────────────────────────

  async fn clear_dataset(&self) -> Result<()> {
    self.conn.call(|conn| Ok(load::clear(conn)?)).await?;
    debug!("cleared all retail tables");
    Ok(())
  }

  async fn insert_countries(&self, names: Vec<String>) -> Result<Vec<Country>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::countries(conn, names)?))
        .await?,
    )
  }

  async fn insert_customers(&self, customers: Vec<Customer>) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::customers(conn, customers)?))
        .await?,
    )
  }

  async fn insert_products(&self, products: Vec<Product>) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::products(conn, products)?))
        .await?,
    )
  }

  async fn insert_categories(&self, categories: Vec<NewCategory>) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::categories(conn, categories)?))
        .await?,
    )
  }

  async fn insert_invoices(&self, invoices: Vec<Invoice>) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::invoices(conn, invoices)?))
        .await?,
    )
  }

  async fn insert_invoice_lines(&self, lines: Vec<NewInvoiceLine>) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::invoice_lines(conn, lines)?))
        .await?,
    )
  }

  async fn initialize_stock(&self, multiplier: StockMultiplier) -> Result<u64> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(load::stock(conn, multiplier)?))
        .await?,
    )
  }

  // ── Reference reads ───────────────────────────────────────────────────────

  async fn table_counts(&self) -> Result<TableCounts> {
    Ok(self.conn.call(|conn| Ok(query::table_counts(conn)?)).await?)
  }

  async fn date_bounds(&self) -> Result<Option<DateBounds>> {
    let raw = self.conn.call(|conn| Ok(query::date_bounds(conn)?)).await?;
    raw
      .map(|(min, max)| {
        Ok(DateBounds { min: decode_date(&min)?, max: decode_date(&max)? })
      })
      .transpose()
  }

  async fn invoice_dates(&self) -> Result<Vec<NaiveDate>> {
    let raws = self.conn.call(|conn| Ok(query::invoice_dates(conn)?)).await?;
    raws.iter().map(|s| decode_date(s)).collect()
  }

  async fn total_sales(&self) -> Result<f64> {
    Ok(self.conn.call(|conn| Ok(query::total_sales(conn)?)).await?)
  }

  async fn category_names(&self) -> Result<Vec<String>> {
    self
      .names("SELECT DISTINCT category_name FROM category ORDER BY category_name")
      .await
  }

  async fn country_names(&self) -> Result<Vec<String>> {
    self
      .names("SELECT country_name FROM country ORDER BY country_name")
      .await
  }

  // ── Sales aggregates ──────────────────────────────────────────────────────

  async fn sales_trend(&self, filter: SalesFilter) -> Result<Vec<SalesTrendPoint>> {
    let raws: Vec<RawTrendPoint> = self
      .conn
      .call(move |conn| Ok(query::sales_trend(conn, &filter)?))
      .await?;
    raws.into_iter().map(RawTrendPoint::into_point).collect()
  }

  async fn top_products(&self, filter: SalesFilter, limit: usize) -> Result<Vec<ProductRevenue>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::top_products(conn, &filter, limit)?))
        .await?,
    )
  }

  async fn category_sales(&self, filter: SalesFilter) -> Result<Vec<CategorySales>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::category_sales(conn, &filter)?))
        .await?,
    )
  }

  async fn customers_by_country(&self, filter: SalesFilter) -> Result<Vec<CountryCustomers>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::customers_by_country(conn, &filter)?))
        .await?,
    )
  }

  async fn revenue_by_country(&self, filter: SalesFilter) -> Result<Vec<CountryRevenue>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::revenue_by_country(conn, &filter)?))
        .await?,
    )
  }

  async fn order_metrics(&self, filter: SalesFilter) -> Result<OrderMetrics> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::order_metrics(conn, &filter)?))
        .await?,
    )
  }

  async fn recent_invoices(&self, filter: SalesFilter, limit: usize) -> Result<Vec<InvoiceSummary>> {
    let raws: Vec<RawInvoiceSummary> = self
      .conn
      .call(move |conn| Ok(query::recent_invoices(conn, &filter, limit)?))
      .await?;
    raws.into_iter().map(RawInvoiceSummary::into_summary).collect()
  }

  async fn repeat_customers(&self, filter: SalesFilter, limit: usize) -> Result<Vec<RepeatCustomer>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::repeat_customers(conn, &filter, limit)?))
        .await?,
    )
  }

  // ── Inventory ─────────────────────────────────────────────────────────────

  async fn stock_alerts(&self, threshold: i64, limit: usize) -> Result<Vec<StockAlert>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query::stock_alerts(conn, threshold, limit)?))
        .await?,
    )
  }
}
