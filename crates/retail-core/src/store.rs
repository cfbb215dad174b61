//! The `RetailStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `retail-store-sqlite`).
//! The importer writes through the phase methods; the API and web layers read
//! through the query methods. Neither depends on a concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  filter::{DateBounds, SalesFilter},
  model::{Country, Customer, Invoice, NewCategory, NewInvoiceLine, Product, StockMultiplier},
  report::{
    CategorySales, CountryCustomers, CountryRevenue, InvoiceSummary, OrderMetrics,
    ProductRevenue, RepeatCustomer, SalesTrendPoint, StockAlert, TableCounts,
  },
};

/// Abstraction over a retail analytics store backend.
///
/// Each import phase method commits its rows in one transaction and rolls the
/// whole phase back on error. Phases must be called in dependency order:
/// countries, customers, products, categories, invoices, invoice lines, stock.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RetailStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Import phases ─────────────────────────────────────────────────────

  /// Delete every imported row and reset surrogate key sequences.
  fn clear_dataset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert countries by name, returning them with their assigned ids in
  /// input order.
  fn insert_countries(
    &self,
    names: Vec<String>,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  fn insert_customers(
    &self,
    customers: Vec<Customer>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn insert_products(
    &self,
    products: Vec<Product>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn insert_categories(
    &self,
    categories: Vec<NewCategory>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn insert_invoices(
    &self,
    invoices: Vec<Invoice>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn insert_invoice_lines(
    &self,
    lines: Vec<NewInvoiceLine>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Write one stock row per product, seeded from total units sold. A
  /// product without invoice lines starts at zero. Returns the number of
  /// stock rows written.
  fn initialize_stock(
    &self,
    multiplier: StockMultiplier,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Reference reads ───────────────────────────────────────────────────

  fn table_counts(&self) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;

  /// `None` when no invoices exist.
  fn date_bounds(
    &self,
  ) -> impl Future<Output = Result<Option<DateBounds>, Self::Error>> + Send + '_;

  /// Distinct calendar dates carrying at least one invoice, ascending.
  fn invoice_dates(
    &self,
  ) -> impl Future<Output = Result<Vec<NaiveDate>, Self::Error>> + Send + '_;

  /// Sum of all line totals.
  fn total_sales(&self) -> impl Future<Output = Result<f64, Self::Error>> + Send + '_;

  fn category_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn country_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Sales aggregates ──────────────────────────────────────────────────

  /// Daily sales, ascending by date.
  fn sales_trend(
    &self,
    filter: SalesFilter,
  ) -> impl Future<Output = Result<Vec<SalesTrendPoint>, Self::Error>> + Send + '_;

  /// Best-selling products by revenue, descending.
  fn top_products(
    &self,
    filter: SalesFilter,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ProductRevenue>, Self::Error>> + Send + '_;

  /// Sales per category, descending.
  fn category_sales(
    &self,
    filter: SalesFilter,
  ) -> impl Future<Output = Result<Vec<CategorySales>, Self::Error>> + Send + '_;

  /// Distinct purchasing customers per country, descending.
  fn customers_by_country(
    &self,
    filter: SalesFilter,
  ) -> impl Future<Output = Result<Vec<CountryCustomers>, Self::Error>> + Send + '_;

  /// Revenue per country, descending.
  fn revenue_by_country(
    &self,
    filter: SalesFilter,
  ) -> impl Future<Output = Result<Vec<CountryRevenue>, Self::Error>> + Send + '_;

  /// Order count, total and average order value. All zero when nothing
  /// matches.
  fn order_metrics(
    &self,
    filter: SalesFilter,
  ) -> impl Future<Output = Result<OrderMetrics, Self::Error>> + Send + '_;

  /// Most recent invoices with their totals, newest first.
  fn recent_invoices(
    &self,
    filter: SalesFilter,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<InvoiceSummary>, Self::Error>> + Send + '_;

  /// Customers with more than one invoice, by order count then spend.
  fn repeat_customers(
    &self,
    filter: SalesFilter,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<RepeatCustomer>, Self::Error>> + Send + '_;

  // ── Inventory ─────────────────────────────────────────────────────────

  /// Products whose stock is below `threshold`, lowest first.
  fn stock_alerts(
    &self,
    threshold: i64,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<StockAlert>, Self::Error>> + Send + '_;
}
