//! The dashboard query service.
//!
//! Turns raw query-string parameters into a [`SalesFilter`] using the store's
//! date bounds, then assembles the multi-query snapshots behind the two
//! dashboards. The HTML pages and the `/dashboard{1,2}/data` endpoints render
//! the same snapshots.

use chrono::NaiveDate;
use retail_core::{
  filter::{DateBounds, DateRange, SalesFilter, parse_date},
  report::{
    CategorySales, CountryCustomers, CountryRevenue, InvoiceSummary, OrderMetrics,
    ProductRevenue, SalesTrendPoint,
  },
  store::RetailStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Tunables for the dashboards, read from the `[dashboard]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
  /// Length of the default date window, in days, ending at the latest
  /// invoice date.
  pub window_days:            u32,
  pub top_products_limit:     usize,
  pub recent_orders_limit:    usize,
  pub repeat_customers_limit: usize,
  /// Products with fewer units than this appear in stock alerts.
  pub low_stock_threshold:    i64,
  pub stock_alert_limit:      usize,
}

impl Default for DashboardSettings {
  fn default() -> Self {
    Self {
      window_days:            30,
      top_products_limit:     10,
      recent_orders_limit:    10,
      repeat_customers_limit: 10,
      low_stock_threshold:    10,
      stock_alert_limit:      20,
    }
  }
}

// ─── Analytical dashboard ────────────────────────────────────────────────────

/// Query parameters shared by the analytical dashboard and its endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticalParams {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub category:   Option<String>,
  pub search:     Option<String>,
  pub country:    Option<String>,
}

impl AnalyticalParams {
  /// A filter whose range defaults to the latest `window_days` days.
  ///
  /// The range is `None` only when the store has no invoices yet.
  pub fn filter(&self, bounds: Option<DateBounds>, window_days: u32) -> Result<SalesFilter, ApiError> {
    let (start, end) = self.dates()?;
    let range = bounds
      .map(|b| b.window(start, end, window_days))
      .transpose()?;
    Ok(self.narrow(SalesFilter::default().with_range(range)))
  }

  /// Like [`Self::filter`], but without an explicit date the whole history
  /// is used rather than the default window.
  pub fn history_filter(
    &self,
    bounds: Option<DateBounds>,
    window_days: u32,
  ) -> Result<SalesFilter, ApiError> {
    let (start, end) = self.dates()?;
    if start.is_none() && end.is_none() {
      return Ok(self.narrow(SalesFilter::default()));
    }
    self.filter(bounds, window_days)
  }

  fn dates(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
    Ok((
      parse_date(self.start_date.as_deref())?,
      parse_date(self.end_date.as_deref())?,
    ))
  }

  fn narrow(&self, filter: SalesFilter) -> SalesFilter {
    filter
      .with_category(self.category.clone())
      .with_country(self.country.clone())
      .with_search(self.search.clone())
  }
}

/// The filters actually applied, echoed back so pages can show them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedFilters {
  pub start_date: Option<NaiveDate>,
  pub end_date:   Option<NaiveDate>,
  pub category:   Option<String>,
  pub country:    Option<String>,
  pub search:     Option<String>,
}

impl From<&SalesFilter> for AppliedFilters {
  fn from(f: &SalesFilter) -> Self {
    Self {
      start_date: f.range.map(|r| r.start),
      end_date:   f.range.map(|r| r.end),
      category:   f.category.clone(),
      country:    f.country.clone(),
      search:     f.search.clone(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticalSnapshot {
  pub has_data:              bool,
  pub filters:               AppliedFilters,
  pub date_bounds:           Option<DateBounds>,
  pub categories:            Vec<String>,
  pub countries:             Vec<String>,
  pub metrics:               OrderMetrics,
  pub sales_trend:           Vec<SalesTrendPoint>,
  pub top_products:          Vec<ProductRevenue>,
  pub category_distribution: Vec<CategorySales>,
  pub customer_segments:     Vec<CountryCustomers>,
  pub revenue_by_country:    Vec<CountryRevenue>,
}

pub async fn analytical<S: RetailStore>(
  store: &S,
  settings: &DashboardSettings,
  params: &AnalyticalParams,
) -> Result<AnalyticalSnapshot, ApiError> {
  let bounds = store.date_bounds().await.map_err(ApiError::store)?;
  let filter = params.filter(bounds, settings.window_days)?;
  let categories = store.category_names().await.map_err(ApiError::store)?;
  let countries = store.country_names().await.map_err(ApiError::store)?;

  let mut snapshot = AnalyticalSnapshot {
    has_data: bounds.is_some(),
    filters: AppliedFilters::from(&filter),
    date_bounds: bounds,
    categories,
    countries,
    ..Default::default()
  };
  if bounds.is_none() {
    return Ok(snapshot);
  }

  snapshot.metrics = store
    .order_metrics(filter.clone())
    .await
    .map_err(ApiError::store)?;
  snapshot.sales_trend = store
    .sales_trend(filter.clone())
    .await
    .map_err(ApiError::store)?;
  snapshot.top_products = store
    .top_products(filter.clone(), settings.top_products_limit)
    .await
    .map_err(ApiError::store)?;
  snapshot.category_distribution = store
    .category_sales(filter.clone())
    .await
    .map_err(ApiError::store)?;
  snapshot.customer_segments = store
    .customers_by_country(filter.clone())
    .await
    .map_err(ApiError::store)?;
  snapshot.revenue_by_country = store
    .revenue_by_country(filter)
    .await
    .map_err(ApiError::store)?;
  Ok(snapshot)
}

// ─── Operational dashboard ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
  /// The latest day that has invoices.
  #[default]
  Today,
  Custom,
}

impl DateMode {
  fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
    match raw.map(str::trim).unwrap_or_default() {
      "" | "today" => Ok(DateMode::Today),
      "custom" => Ok(DateMode::Custom),
      other => Err(ApiError::BadRequest(format!(
        "date_mode must be 'today' or 'custom', got {other:?}"
      ))),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalParams {
  pub date_mode:   Option<String>,
  pub custom_date: Option<String>,
  pub country:     Option<String>,
  pub start_date:  Option<String>,
  pub end_date:    Option<String>,
}

/// The day or range an operational view covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalScope {
  pub mode:   DateMode,
  pub range:  Option<DateRange>,
  pub filter: SalesFilter,
}

impl OperationalParams {
  /// Resolve the covered range. An explicit `start_date`/`end_date` wins;
  /// otherwise `custom` mode uses `custom_date` and `today` mode (or
  /// `custom` without a date) uses the latest invoice date.
  pub fn scope(&self, bounds: Option<DateBounds>, window_days: u32) -> Result<OperationalScope, ApiError> {
    let mode = DateMode::parse(self.date_mode.as_deref())?;
    let start = parse_date(self.start_date.as_deref())?;
    let end = parse_date(self.end_date.as_deref())?;
    let custom = parse_date(self.custom_date.as_deref())?;

    let range = match bounds {
      None => None,
      Some(b) if start.is_some() || end.is_some() => Some(b.window(start, end, window_days)?),
      Some(b) => match (mode, custom) {
        (DateMode::Custom, Some(day)) => Some(DateRange::single_day(day)),
        _ => Some(DateRange::single_day(b.max)),
      },
    };
    let filter = SalesFilter::default()
      .with_range(range)
      .with_country(self.country.clone());
    Ok(OperationalScope { mode, range, filter })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
  pub status: String,
  pub count:  i64,
}

/// Every imported invoice counts as completed; the source has no status.
pub fn status_distribution(metrics: &OrderMetrics) -> Vec<StatusCount> {
  vec![StatusCount { status: "completed".to_owned(), count: metrics.order_count }]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationalSnapshot {
  pub has_data:            bool,
  pub date_mode:           DateMode,
  /// The last day covered, shown as "as of".
  pub current_date:        Option<NaiveDate>,
  pub range:               Option<DateRange>,
  pub country:             Option<String>,
  pub countries:           Vec<String>,
  pub date_bounds:         Option<DateBounds>,
  pub daily_metrics:       OrderMetrics,
  pub status_distribution: Vec<StatusCount>,
  pub recent_orders:       Vec<InvoiceSummary>,
}

pub async fn operational<S: RetailStore>(
  store: &S,
  settings: &DashboardSettings,
  params: &OperationalParams,
) -> Result<OperationalSnapshot, ApiError> {
  let bounds = store.date_bounds().await.map_err(ApiError::store)?;
  let scope = params.scope(bounds, settings.window_days)?;
  let countries = store.country_names().await.map_err(ApiError::store)?;

  let mut snapshot = OperationalSnapshot {
    has_data: bounds.is_some(),
    date_mode: scope.mode,
    current_date: scope.range.map(|r| r.end),
    range: scope.range,
    country: scope.filter.country.clone(),
    countries,
    date_bounds: bounds,
    ..Default::default()
  };
  let (Some(bounds), Some(range)) = (bounds, scope.range) else {
    snapshot.status_distribution = status_distribution(&snapshot.daily_metrics);
    return Ok(snapshot);
  };

  snapshot.daily_metrics = store
    .order_metrics(scope.filter.clone())
    .await
    .map_err(ApiError::store)?;
  snapshot.status_distribution = status_distribution(&snapshot.daily_metrics);

  // Recent orders are the latest up to the covered day, not only on it.
  let history = DateRange::new(bounds.min.min(range.end), range.end)?;
  snapshot.recent_orders = store
    .recent_invoices(scope.filter.with_range(Some(history)), settings.recent_orders_limit)
    .await
    .map_err(ApiError::store)?;
  Ok(snapshot)
}
