//! The import pipeline.
//!
//! An [`ImportRun`] is the unit of work for one import: it owns the resolved
//! column map, the options and the running summary, and carries the parent
//! key maps from each phase into the next. Phases run in dependency order,
//! each committed by the store in its own transaction.

use std::collections::{HashMap, HashSet};

use retail_core::{
  category::CategoryTable,
  model::{Product, StockMultiplier},
  store::RetailStore,
};
use serde::Serialize;
use tracing::{Instrument as _, info, info_span, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  columns::ColumnMap,
  extract::{self, Extracted},
  source::SourceTable,
};

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
  pub stock_multiplier: StockMultiplier,
  pub categories:       CategoryTable,
}

/// Rows written per table and rows skipped per phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  pub run_id:            Uuid,
  pub source_rows:       usize,
  pub countries:         u64,
  pub customers:         u64,
  pub products:          u64,
  pub categories:        u64,
  pub invoices:          u64,
  pub invoice_lines:     u64,
  pub stock:             u64,
  pub skipped_customers: usize,
  pub skipped_invoices:  usize,
  pub skipped_lines:     usize,
}

impl ImportSummary {
  pub fn skipped(&self) -> usize {
    self.skipped_customers + self.skipped_invoices + self.skipped_lines
  }
}

/// Import `source` into `store`, replacing whatever the store held.
///
/// Column resolution happens before anything is written; a missing column
/// leaves the store untouched. An empty source is a no-op.
pub async fn run_import<S: RetailStore>(
  store: &S,
  source: &SourceTable,
  options: &ImportOptions,
) -> Result<ImportSummary> {
  let run_id = Uuid::new_v4();
  let span = info_span!("import", %run_id);
  async move {
    info!(rows = source.len(), "starting import");
    if source.is_empty() {
      warn!("source data table is empty, skipping import");
      return Ok(ImportSummary { run_id, ..Default::default() });
    }

    let columns = ColumnMap::resolve(source.headers())?;
    info!(mapping = ?columns.describe(source.headers()), "resolved source columns");

    let run = ImportRun::new(run_id, store, source, columns, options);
    let summary = run.execute().await?;
    info!(
      skipped = summary.skipped(),
      invoice_lines = summary.invoice_lines,
      "data import completed successfully"
    );
    Ok(summary)
  }
  .instrument(span)
  .await
}

/// One in-flight import.
pub struct ImportRun<'a, S> {
  store:   &'a S,
  source:  &'a SourceTable,
  columns: ColumnMap,
  options: &'a ImportOptions,
  summary: ImportSummary,
}

impl<'a, S: RetailStore> ImportRun<'a, S> {
  pub fn new(
    run_id: Uuid,
    store: &'a S,
    source: &'a SourceTable,
    columns: ColumnMap,
    options: &'a ImportOptions,
  ) -> Self {
    Self {
      store,
      source,
      columns,
      options,
      summary: ImportSummary { run_id, source_rows: source.len(), ..Default::default() },
    }
  }

  pub async fn execute(mut self) -> Result<ImportSummary> {
    self.store.clear_dataset().await.map_err(Error::store)?;
    info!("cleared existing data in application tables");

    let country_ids = self.countries().await?;
    let customers = self.customers(&country_ids).await?;
    let products = self.products().await?;
    self.categories(&products).await?;
    let invoices = self.invoices(&customers).await?;
    let product_ids: HashMap<String, i64> = products
      .into_iter()
      .map(|p| (p.stock_code, p.product_id))
      .collect();
    self.invoice_lines(&invoices, &product_ids).await?;
    self.stock().await?;

    Ok(self.summary)
  }

  async fn countries(&mut self) -> Result<HashMap<String, i64>> {
    let names = extract::countries(self.source, &self.columns);
    let inserted = self
      .store
      .insert_countries(names)
      .await
      .map_err(Error::store)?;
    self.summary.countries = inserted.len() as u64;
    info!(count = inserted.len(), "imported countries");
    Ok(
      inserted
        .into_iter()
        .map(|c| (c.country_name, c.country_id))
        .collect(),
    )
  }

  async fn customers(&mut self, country_ids: &HashMap<String, i64>) -> Result<HashSet<i64>> {
    let Extracted { rows, skipped } = extract::customers(self.source, &self.columns, country_ids);
    let ids = rows.iter().map(|c| c.customer_id).collect();
    self.summary.customers = self
      .store
      .insert_customers(rows)
      .await
      .map_err(Error::store)?;
    self.summary.skipped_customers = skipped;
    info!(count = self.summary.customers, skipped, "imported customers");
    Ok(ids)
  }

  async fn products(&mut self) -> Result<Vec<Product>> {
    let products = extract::products(self.source, &self.columns);
    self.summary.products = self
      .store
      .insert_products(products.clone())
      .await
      .map_err(Error::store)?;
    info!(count = self.summary.products, "imported products");
    Ok(products)
  }

  async fn categories(&mut self, products: &[Product]) -> Result<()> {
    let categories = extract::categories(products, &self.options.categories);
    self.summary.categories = self
      .store
      .insert_categories(categories)
      .await
      .map_err(Error::store)?;
    info!(count = self.summary.categories, "imported categories with stock code mappings");
    Ok(())
  }

  async fn invoices(&mut self, customers: &HashSet<i64>) -> Result<HashSet<String>> {
    let Extracted { rows, skipped } = extract::invoices(self.source, &self.columns, customers);
    let numbers = rows.iter().map(|i| i.invoice_no.clone()).collect();
    self.summary.invoices = self
      .store
      .insert_invoices(rows)
      .await
      .map_err(Error::store)?;
    self.summary.skipped_invoices = skipped;
    info!(count = self.summary.invoices, skipped, "imported invoices");
    Ok(numbers)
  }

  async fn invoice_lines(
    &mut self,
    invoices: &HashSet<String>,
    product_ids: &HashMap<String, i64>,
  ) -> Result<()> {
    let Extracted { rows, skipped } =
      extract::invoice_lines(self.source, &self.columns, invoices, product_ids);
    self.summary.invoice_lines = self
      .store
      .insert_invoice_lines(rows)
      .await
      .map_err(Error::store)?;
    self.summary.skipped_lines = skipped;
    info!(count = self.summary.invoice_lines, skipped, "imported invoice lines");
    Ok(())
  }

  async fn stock(&mut self) -> Result<()> {
    let multiplier = self.options.stock_multiplier;
    self.summary.stock = self
      .store
      .initialize_stock(multiplier)
      .await
      .map_err(Error::store)?;
    info!(count = self.summary.stock, multiplier = multiplier.get(), "initialized stock levels");
    Ok(())
  }
}
