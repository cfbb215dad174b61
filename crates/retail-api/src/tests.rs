//! Router tests driving the API with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use retail_core::{
  model::{Customer, Invoice, NewCategory, NewInvoiceLine, Product, StockMultiplier},
  store::RetailStore,
};
use retail_store_sqlite::SqliteStore;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{DashboardSettings, api_router};

fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
  NaiveDate::from_ymd_opt(y, m, d)
    .unwrap()
    .and_hms_opt(h, 0, 0)
    .unwrap()
}

fn line(invoice_no: &str, product_id: i64, quantity: i64, unit_price: f64) -> NewInvoiceLine {
  NewInvoiceLine { invoice_no: invoice_no.into(), product_id, quantity, unit_price }
}

/// Same shape as the store fixture: four invoices over 2023-01-05..2023-02-01.
async fn seeded_store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.unwrap();
  let countries = s
    .insert_countries(vec!["France".into(), "United Kingdom".into()])
    .await
    .unwrap();
  let (fr, uk) = (countries[0].country_id, countries[1].country_id);
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

fn router(store: SqliteStore) -> Router {
  api_router(Arc::new(store), Arc::new(DashboardSettings::default()))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

// ── Sales trend ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn sales_trend_defaults_to_window_ending_at_latest_invoice() {
  let (status, body) = get_json(router(seeded_store().await), "/sales-trend").await;
  assert_eq!(status, StatusCode::OK);
  let dates: Vec<&str> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["date"].as_str().unwrap())
    .collect();
  assert_eq!(dates, vec!["2023-01-05", "2023-01-06", "2023-02-01"]);
}

#[tokio::test]
async fn sales_trend_days_narrows_the_window() {
  let (_, body) = get_json(router(seeded_store().await), "/sales-trend?days=1").await;
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["date"], "2023-02-01");
  assert_eq!(body[0]["total_sales"], 2.5);
}

#[tokio::test]
async fn sales_trend_explicit_range_and_filters() {
  let app = router(seeded_store().await);
  let (_, body) =
    get_json(app.clone(), "/sales-trend?start_date=2023-01-06&end_date=06.01.2023").await;
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["total_sales"], 42.0);

  let (_, body) = get_json(app, "/sales-trend?category=Toys&country=&search=").await;
  let totals: Vec<f64> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["total_sales"].as_f64().unwrap())
    .collect();
  assert_eq!(totals, vec![4.0, 40.0]);
}

#[tokio::test]
async fn invalid_date_is_a_bad_request() {
  let (status, body) =
    get_json(router(seeded_store().await), "/sales-trend?start_date=2023-13-45").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("2023-13-45"));
}

#[tokio::test]
async fn malformed_numbers_are_json_bad_requests() {
  let app = router(seeded_store().await);
  for uri in [
    "/sales-trend?days=abc",
    "/stock-alerts?threshold=x",
    "/repeat-customers?limit=-1",
  ] {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json", "{uri}");
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string(), "{uri}");
  }
}

#[tokio::test]
async fn invalid_date_is_rejected_on_empty_store() {
  let empty = SqliteStore::open_in_memory().await.unwrap();
  let (status, body) = get_json(router(empty), "/sales-trend?start_date=garbage").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("garbage"));
}

#[tokio::test]
async fn inverted_range_is_a_bad_request() {
  let (status, _) = get_json(
    router(seeded_store().await),
    "/sales-trend?start_date=2023-02-01&end_date=2023-01-01",
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Operational metrics ──────────────────────────────────────────────────────

#[tokio::test]
async fn today_means_latest_invoice_date() {
  let (status, body) = get_json(router(seeded_store().await), "/operational-metrics").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["order_count"], 1);
  assert_eq!(body["total_sales"], 2.5);
  assert_eq!(body["date_mode"], "today");
  assert_eq!(body["range"]["start"], "2023-02-01");
  assert_eq!(body["status_distribution"][0]["status"], "completed");
  assert_eq!(body["status_distribution"][0]["count"], 1);
}

#[tokio::test]
async fn custom_date_and_country() {
  let app = router(seeded_store().await);
  let (_, body) = get_json(
    app.clone(),
    "/operational-metrics?date_mode=custom&custom_date=2023-01-06",
  )
  .await;
  assert_eq!(body["order_count"], 2);
  assert_eq!(body["average_order_value"], 21.0);

  let (_, body) = get_json(
    app,
    "/operational-metrics?date_mode=custom&custom_date=2023-01-06&country=France",
  )
  .await;
  assert_eq!(body["order_count"], 1);
  assert_eq!(body["total_sales"], 2.0);
}

#[tokio::test]
async fn empty_range_metrics_are_zero() {
  let (status, body) = get_json(
    router(seeded_store().await),
    "/operational-metrics?date_mode=custom&custom_date=2022-06-01",
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["order_count"], 0);
  assert_eq!(body["total_sales"], 0.0);
  assert_eq!(body["average_order_value"], 0.0);
}

#[tokio::test]
async fn operational_metrics_accepts_explicit_range() {
  let (_, body) = get_json(
    router(seeded_store().await),
    "/operational-metrics?start_date=2023-01-01&end_date=2023-01-31",
  )
  .await;
  assert_eq!(body["order_count"], 3);
  assert_eq!(body["total_sales"], 53.5);
}

#[tokio::test]
async fn unknown_date_mode_is_rejected() {
  let (status, _) =
    get_json(router(seeded_store().await), "/operational-metrics?date_mode=weekly").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Inventory & customers ────────────────────────────────────────────────────

#[tokio::test]
async fn stock_alerts_threshold_and_limit() {
  let app = router(seeded_store().await);
  let (_, body) = get_json(app.clone(), "/stock-alerts").await;
  let alerts = body.as_array().unwrap();
  assert_eq!(alerts.len(), 2);
  assert_eq!(alerts[0]["product_name"], "BIRTHDAY CARD");
  assert_eq!(alerts[0]["quantity_in_stock"], 2);
  assert_eq!(alerts[0]["level"], "critical");

  let (_, body) = get_json(app.clone(), "/stock-alerts?threshold=100").await;
  assert_eq!(body.as_array().unwrap().len(), 3);

  let (_, body) = get_json(app, "/stock-alerts?threshold=100&limit=1").await;
  assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn repeat_customers_span_whole_history() {
  let (_, body) = get_json(router(seeded_store().await), "/repeat-customers").await;
  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["customer_name"], "Customer 1");
  assert_eq!(rows[0]["orders"], 2);
  assert_eq!(rows[0]["total_spent"], 13.5);
}

// ── Dashboard snapshots ──────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard1_snapshot() {
  let (status, body) =
    get_json(router(seeded_store().await), "/dashboard1/data?category=all").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["has_data"], true);
  assert_eq!(body["filters"]["start_date"], "2023-01-03");
  assert_eq!(body["filters"]["end_date"], "2023-02-01");
  assert_eq!(body["filters"]["category"], Value::Null);
  assert_eq!(body["top_products"][0]["product_name"], "WOODEN TOY TRAIN");
  assert_eq!(body["category_distribution"][0]["category"], "Toys");
  assert_eq!(body["customer_segments"][0]["country"], "United Kingdom");
  assert_eq!(body["revenue_by_country"][0]["revenue"], 42.5);
  assert_eq!(body["metrics"]["order_count"], 4);
  assert_eq!(body["categories"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn dashboard2_snapshot_recent_orders_up_to_selected_day() {
  let (_, body) = get_json(
    router(seeded_store().await),
    "/dashboard2/data?date_mode=custom&custom_date=2023-01-06",
  )
  .await;
  assert_eq!(body["current_date"], "2023-01-06");
  assert_eq!(body["daily_metrics"]["order_count"], 2);
  let recent: Vec<&str> = body["recent_orders"]
    .as_array()
    .unwrap()
    .iter()
    .map(|o| o["invoice_no"].as_str().unwrap())
    .collect();
  assert_eq!(recent, vec!["I003", "I002", "I001"]);
}

#[tokio::test]
async fn empty_store_reports_no_data() {
  let empty = SqliteStore::open_in_memory().await.unwrap();
  let app = router(empty);

  let (status, body) = get_json(app.clone(), "/dashboard1/data").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["has_data"], false);
  assert_eq!(body["metrics"]["total_sales"], 0.0);
  assert_eq!(body["sales_trend"].as_array().unwrap().len(), 0);

  let (_, body) = get_json(app.clone(), "/dashboard2/data").await;
  assert_eq!(body["has_data"], false);
  assert_eq!(body["daily_metrics"]["order_count"], 0);
  assert_eq!(body["status_distribution"][0]["count"], 0);

  let (_, body) = get_json(app, "/sales-trend").await;
  assert_eq!(body, Value::Array(vec![]));
}
