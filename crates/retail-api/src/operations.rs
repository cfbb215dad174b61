//! Handlers for operational endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/operational-metrics` | `?date_mode=today\|custom&custom_date=…&country=…`, or `start_date`/`end_date` |
//! | `GET`  | `/stock-alerts` | `?threshold=N&limit=N` |

use axum::{
  Json,
  extract::State,
};
use retail_core::{
  filter::DateRange,
  report::{OrderMetrics, StockAlert},
  store::RetailStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  dashboard::{DateMode, OperationalParams, StatusCount, status_distribution},
  error::ApiError,
  extract::ApiQuery,
};

// ─── Operational metrics ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalMetrics {
  #[serde(flatten)]
  pub metrics:             OrderMetrics,
  pub status_distribution: Vec<StatusCount>,
  pub date_mode:           DateMode,
  pub range:               Option<DateRange>,
  pub country:             Option<String>,
}

/// `GET /operational-metrics`
pub async fn metrics<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<OperationalParams>,
) -> Result<Json<OperationalMetrics>, ApiError> {
  let bounds = state.store.date_bounds().await.map_err(ApiError::store)?;
  let scope = params.scope(bounds, state.settings.window_days)?;
  let metrics = match scope.range {
    Some(_) => state
      .store
      .order_metrics(scope.filter.clone())
      .await
      .map_err(ApiError::store)?,
    None => OrderMetrics::default(),
  };
  Ok(Json(OperationalMetrics {
    status_distribution: status_distribution(&metrics),
    metrics,
    date_mode: scope.mode,
    range: scope.range,
    country: scope.filter.country,
  }))
}

// ─── Stock alerts ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StockAlertParams {
  pub threshold: Option<i64>,
  pub limit:     Option<usize>,
}

/// `GET /stock-alerts[?threshold=N&limit=N]`
pub async fn stock_alerts<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<StockAlertParams>,
) -> Result<Json<Vec<StockAlert>>, ApiError> {
  let threshold = params.threshold.unwrap_or(state.settings.low_stock_threshold);
  let limit = params.limit.unwrap_or(state.settings.stock_alert_limit);
  let alerts = state
    .store
    .stock_alerts(threshold, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(alerts))
}
