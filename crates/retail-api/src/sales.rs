//! Handlers for sales endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sales-trend` | `?days=N` plus analytical filters; explicit dates win over `days` |
//! | `GET`  | `/repeat-customers` | Analytical filters, `?limit=N`; whole history unless dated |

use axum::{
  Json,
  extract::State,
};
use retail_core::{
  report::{RepeatCustomer, SalesTrendPoint},
  store::RetailStore,
};
use serde::Deserialize;

use crate::{ApiState, dashboard::AnalyticalParams, error::ApiError, extract::ApiQuery};

// ─── Sales trend ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TrendParams {
  pub days: Option<u32>,
}

/// `GET /sales-trend[?days=N]`
pub async fn trend<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<TrendParams>,
  ApiQuery(filters): ApiQuery<AnalyticalParams>,
) -> Result<Json<Vec<SalesTrendPoint>>, ApiError> {
  let days = params.days.unwrap_or(state.settings.window_days);
  if days == 0 {
    return Err(ApiError::BadRequest("days must be at least 1".to_owned()));
  }
  let bounds = state.store.date_bounds().await.map_err(ApiError::store)?;
  let filter = filters.filter(bounds, days)?;
  if bounds.is_none() {
    return Ok(Json(Vec::new()));
  }
  let points = state
    .store
    .sales_trend(filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(points))
}

// ─── Repeat customers ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LimitParams {
  pub limit: Option<usize>,
}

/// `GET /repeat-customers[?limit=N]`
pub async fn repeat_customers<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<LimitParams>,
  ApiQuery(filters): ApiQuery<AnalyticalParams>,
) -> Result<Json<Vec<RepeatCustomer>>, ApiError> {
  let bounds = state.store.date_bounds().await.map_err(ApiError::store)?;
  let filter = filters.history_filter(bounds, state.settings.window_days)?;
  let limit = params.limit.unwrap_or(state.settings.repeat_customers_limit);
  let customers = state
    .store
    .repeat_customers(filter, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(customers))
}
