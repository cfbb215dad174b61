//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveDateTime};
use retail_core::{
  filter::{DateBounds, DateRange, SalesFilter},
  model::{Customer, Invoice, NewCategory, NewInvoiceLine, Product, StockMultiplier},
  report::{OrderMetrics, StockLevel},
  store::RetailStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
  day(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

fn line(invoice_no: &str, product_id: i64, quantity: i64, unit_price: f64) -> NewInvoiceLine {
  NewInvoiceLine { invoice_no: invoice_no.into(), product_id, quantity, unit_price }
}

/// Two countries, three customers, three products, four invoices.
///
/// | invoice | date       | customer | lines                      | total |
/// |---------|------------|----------|----------------------------|-------|
/// | I001    | 2023-01-05 | 1 (FR)   | 3 × ABC1 @2.5, 1 × TOY9 @4 | 11.5  |
/// | I002    | 2023-01-06 | 1 (FR)   | 2 × CARD1 @1               | 2.0   |
/// | I003    | 2023-01-06 | 2 (UK)   | 10 × TOY9 @4               | 40.0  |
/// | I004    | 2023-02-01 | 3 (UK)   | 1 × ABC1 @2.5              | 2.5   |
async fn seeded() -> SqliteStore {
  let s = store().await;
  s.clear_dataset().await.unwrap();

  let countries = s
    .insert_countries(vec!["France".into(), "United Kingdom".into()])
    .await
    .unwrap();
  let fr = countries[0].country_id;
  let uk = countries[1].country_id;

  s.insert_customers(vec![
    Customer { customer_id: 1, country_id: fr },
    Customer { customer_id: 2, country_id: uk },
    Customer { customer_id: 3, country_id: uk },
  ])
  .await
  .unwrap();

  s.insert_products(vec![
    Product { product_id: 1, stock_code: "ABC1".into(), description: "RED HEART DECOR".into() },
    Product { product_id: 2, stock_code: "TOY9".into(), description: "WOODEN TOY TRAIN".into() },
    Product { product_id: 3, stock_code: "CARD1".into(), description: "BIRTHDAY CARD".into() },
  ])
  .await
  .unwrap();

  s.insert_categories(vec![
    NewCategory { category_name: "Home Decor".into(), stock_code: "ABC1".into() },
    NewCategory { category_name: "Toys".into(), stock_code: "TOY9".into() },
    NewCategory { category_name: "Stationery".into(), stock_code: "CARD1".into() },
  ])
  .await
  .unwrap();

  s.insert_invoices(vec![
    Invoice { invoice_no: "I001".into(), invoice_date: at(2023, 1, 5, 9), customer_id: 1 },
    Invoice { invoice_no: "I002".into(), invoice_date: at(2023, 1, 6, 10), customer_id: 1 },
    Invoice { invoice_no: "I003".into(), invoice_date: at(2023, 1, 6, 15), customer_id: 2 },
    Invoice { invoice_no: "I004".into(), invoice_date: at(2023, 2, 1, 8), customer_id: 3 },
  ])
  .await
  .unwrap();

  s.insert_invoice_lines(vec![
    line("I001", 1, 3, 2.5),
    line("I001", 2, 1, 4.0),
    line("I002", 3, 2, 1.0),
    line("I003", 2, 10, 4.0),
    line("I004", 1, 1, 2.5),
  ])
  .await
  .unwrap();

  s.initialize_stock(StockMultiplier::default()).await.unwrap();
  s
}

fn january() -> SalesFilter {
  SalesFilter::default().with_range(Some(DateRange::new(day(2023, 1, 1), day(2023, 1, 31)).unwrap()))
}

// ─── Schema & import phases ──────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_reads_as_zero() {
  let s = store().await;
  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.invoice, 0);
  assert_eq!(s.date_bounds().await.unwrap(), None);
  assert_eq!(s.total_sales().await.unwrap(), 0.0);
  assert!(s.invoice_dates().await.unwrap().is_empty());
  assert_eq!(s.order_metrics(SalesFilter::default()).await.unwrap(), OrderMetrics::default());
}

#[tokio::test]
async fn phases_populate_every_table() {
  let s = seeded().await;
  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.country, 2);
  assert_eq!(counts.customer, 3);
  assert_eq!(counts.product, 3);
  assert_eq!(counts.category, 3);
  assert_eq!(counts.invoice, 4);
  assert_eq!(counts.invoice_line, 5);
  assert_eq!(counts.stock, 3);
}

#[tokio::test]
async fn country_ids_restart_after_clear() {
  let s = seeded().await;
  s.clear_dataset().await.unwrap();
  assert_eq!(s.table_counts().await.unwrap(), Default::default());

  let again = s.insert_countries(vec!["France".into()]).await.unwrap();
  assert_eq!(again[0].country_id, 1);
}

#[tokio::test]
async fn orphan_invoice_line_is_rejected_and_phase_rolls_back() {
  let s = seeded().await;
  let err = s
    .insert_invoice_lines(vec![line("I001", 1, 1, 1.0), line("MISSING", 1, 1, 1.0)])
    .await;
  assert!(err.is_err());
  // The valid first row was rolled back with the rest of the phase.
  assert_eq!(s.table_counts().await.unwrap().invoice_line, 5);
}

#[tokio::test]
async fn stock_uses_multiplier() {
  let s = seeded().await;
  s.initialize_stock(StockMultiplier::new(1.5).unwrap()).await.unwrap();
  // ABC1 sold 4 units, TOY9 11, CARD1 2.
  let alerts = s.stock_alerts(100, 10).await.unwrap();
  let by_code: Vec<(&str, i64)> = alerts
    .iter()
    .map(|a| (a.stock_code.as_str(), a.quantity_in_stock))
    .collect();
  assert_eq!(by_code, vec![("CARD1", 3), ("ABC1", 6), ("TOY9", 16)]);
}

#[tokio::test]
async fn unsold_product_starts_with_zero_stock() {
  let s = seeded().await;
  s.insert_products(vec![Product {
    product_id:  4,
    stock_code:  "NEW1".into(),
    description: "NEW LAMP".into(),
  }])
  .await
  .unwrap();

  assert_eq!(s.initialize_stock(StockMultiplier::default()).await.unwrap(), 4);
  assert_eq!(s.table_counts().await.unwrap().stock, 4);

  let alerts = s.stock_alerts(1, 10).await.unwrap();
  assert_eq!(alerts.len(), 1);
  assert_eq!(alerts[0].stock_code, "NEW1");
  assert_eq!(alerts[0].quantity_in_stock, 0);
  assert_eq!(alerts[0].level, StockLevel::Critical);
}

#[tokio::test]
async fn reset_recreates_empty_schema() {
  let s = seeded().await;
  s.reset().await.unwrap();
  assert_eq!(s.table_counts().await.unwrap().invoice, 0);
  s.insert_countries(vec!["France".into()]).await.unwrap();
}

// ─── Reference reads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn date_bounds_and_distinct_dates() {
  let s = seeded().await;
  assert_eq!(
    s.date_bounds().await.unwrap(),
    Some(DateBounds { min: day(2023, 1, 5), max: day(2023, 2, 1) })
  );
  assert_eq!(
    s.invoice_dates().await.unwrap(),
    vec![day(2023, 1, 5), day(2023, 1, 6), day(2023, 2, 1)]
  );
  assert_eq!(s.total_sales().await.unwrap(), 56.0);
  assert_eq!(
    s.category_names().await.unwrap(),
    vec!["Home Decor", "Stationery", "Toys"]
  );
  assert_eq!(s.country_names().await.unwrap(), vec!["France", "United Kingdom"]);
}

// ─── Sales aggregates ────────────────────────────────────────────────────────

#[tokio::test]
async fn sales_trend_groups_by_day_within_range() {
  let s = seeded().await;
  let trend = s.sales_trend(january()).await.unwrap();
  assert_eq!(trend.len(), 2);
  assert_eq!(trend[0].date, day(2023, 1, 5));
  assert_eq!(trend[0].total_sales, 11.5);
  assert_eq!(trend[1].date, day(2023, 1, 6));
  assert_eq!(trend[1].total_sales, 42.0);
}

#[tokio::test]
async fn range_end_includes_the_whole_day() {
  let s = seeded().await;
  let filter = SalesFilter::default().with_range(Some(DateRange::single_day(day(2023, 1, 6))));
  let metrics = s.order_metrics(filter).await.unwrap();
  assert_eq!(metrics.order_count, 2);
  assert_eq!(metrics.total_sales, 42.0);
  assert_eq!(metrics.average_order_value, 21.0);
}

#[tokio::test]
async fn top_products_by_revenue() {
  let s = seeded().await;
  let top = s.top_products(SalesFilter::default(), 10).await.unwrap();
  let codes: Vec<&str> = top.iter().map(|p| p.stock_code.as_str()).collect();
  assert_eq!(codes, vec!["TOY9", "ABC1", "CARD1"]);
  assert_eq!(top[0].revenue, 44.0);
  assert_eq!(top[0].quantity, 11);

  let limited = s.top_products(SalesFilter::default(), 1).await.unwrap();
  assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn category_and_country_filters_compose() {
  let s = seeded().await;
  let toys = SalesFilter::default().with_category(Some("Toys".into()));
  let cats = s.category_sales(toys.clone()).await.unwrap();
  assert_eq!(cats.len(), 1);
  assert_eq!(cats[0].category, "Toys");
  assert_eq!(cats[0].sales, 44.0);

  let toys_in_france = toys.with_country(Some("France".into()));
  let revenue = s.revenue_by_country(toys_in_france).await.unwrap();
  assert_eq!(revenue.len(), 1);
  assert_eq!(revenue[0].country, "France");
  assert_eq!(revenue[0].revenue, 4.0);
}

#[tokio::test]
async fn uncategorized_bucket_is_filterable() {
  let s = seeded().await;
  s.insert_products(vec![Product {
    product_id:  4,
    stock_code:  "MYS1".into(),
    description: "MYSTERY ITEM".into(),
  }])
  .await
  .unwrap();
  s.insert_invoice_lines(vec![line("I004", 4, 2, 3.0)]).await.unwrap();

  let all = s.category_sales(SalesFilter::default()).await.unwrap();
  assert!(all.iter().any(|c| c.category == "Uncategorized" && c.sales == 6.0));

  let only = SalesFilter::default().with_category(Some("Uncategorized".into()));
  let cats = s.category_sales(only.clone()).await.unwrap();
  assert_eq!(cats.len(), 1);
  assert_eq!(cats[0].sales, 6.0);
  let top = s.top_products(only, 10).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].stock_code, "MYS1");
}

#[tokio::test]
async fn search_matches_description_or_stock_code() {
  let s = seeded().await;
  let by_desc = s
    .top_products(SalesFilter::default().with_search(Some("heart".into())), 10)
    .await
    .unwrap();
  assert_eq!(by_desc.len(), 1);
  assert_eq!(by_desc[0].stock_code, "ABC1");

  let by_code = s
    .top_products(SalesFilter::default().with_search(Some("toy9".into())), 10)
    .await
    .unwrap();
  assert_eq!(by_code.len(), 1);
  assert_eq!(by_code[0].product_name, "WOODEN TOY TRAIN");
}

#[tokio::test]
async fn customers_by_country_counts_distinct_buyers() {
  let s = seeded().await;
  let rows = s.customers_by_country(SalesFilter::default()).await.unwrap();
  assert_eq!(rows[0].country, "United Kingdom");
  assert_eq!(rows[0].count, 2);
  assert_eq!(rows[1].country, "France");
  assert_eq!(rows[1].count, 1);
}

#[tokio::test]
async fn empty_range_metrics_are_zero_not_null() {
  let s = seeded().await;
  let filter = SalesFilter::default().with_range(Some(DateRange::single_day(day(2022, 6, 1))));
  let metrics = s.order_metrics(filter.clone()).await.unwrap();
  assert_eq!(metrics, OrderMetrics::default());
  assert!(s.sales_trend(filter.clone()).await.unwrap().is_empty());
  assert!(s.category_sales(filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_invoices_newest_first() {
  let s = seeded().await;
  let recent = s.recent_invoices(SalesFilter::default(), 2).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].invoice_no, "I004");
  assert_eq!(recent[0].customer_name, "Customer 3");
  assert_eq!(recent[1].invoice_no, "I003");
  assert_eq!(recent[1].total_amount, 40.0);
}

#[tokio::test]
async fn repeat_customers_need_two_orders() {
  let s = seeded().await;
  let repeat = s.repeat_customers(SalesFilter::default(), 10).await.unwrap();
  assert_eq!(repeat.len(), 1);
  assert_eq!(repeat[0].customer_id, 1);
  assert_eq!(repeat[0].orders, 2);
  assert_eq!(repeat[0].total_spent, 13.5);
  assert_eq!(repeat[0].country, "France");
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn stock_alerts_below_threshold() {
  let s = seeded().await;
  // Stock equals units sold: CARD1 2, ABC1 4, TOY9 11.
  let alerts = s.stock_alerts(10, 20).await.unwrap();
  assert_eq!(alerts.len(), 2);
  assert_eq!(alerts[0].stock_code, "CARD1");
  assert_eq!(alerts[0].level, StockLevel::Critical);
  assert_eq!(alerts[1].quantity_in_stock, 4);
}
