//! JSON API and dashboard query service for the retail analytics store.
//!
//! Exposes an axum [`Router`] backed by any [`retail_core::store::RetailStore`].
//! Page rendering, configuration and transport are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", retail_api::api_router(store.clone(), settings))
//! ```

pub mod dashboard;
pub mod error;
pub mod extract;
pub mod operations;
pub mod sales;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use retail_core::store::RetailStore;

pub use dashboard::DashboardSettings;
pub use error::ApiError;
pub use extract::ApiQuery;

use dashboard::{AnalyticalParams, AnalyticalSnapshot, OperationalParams, OperationalSnapshot};

/// State shared by every API handler.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub settings: Arc<DashboardSettings>,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, settings: Arc<DashboardSettings>) -> Router<()>
where
  S: RetailStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Dashboard snapshots
    .route("/dashboard1/data", get(dashboard1_data::<S>))
    .route("/dashboard2/data", get(dashboard2_data::<S>))
    // Sales
    .route("/sales-trend", get(sales::trend::<S>))
    .route("/repeat-customers", get(sales::repeat_customers::<S>))
    // Operations
    .route("/operational-metrics", get(operations::metrics::<S>))
    .route("/stock-alerts", get(operations::stock_alerts::<S>))
    .with_state(ApiState { store, settings })
}

/// `GET /dashboard1/data`: the analytical dashboard as JSON.
pub async fn dashboard1_data<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<AnalyticalParams>,
) -> Result<Json<AnalyticalSnapshot>, ApiError> {
  let snapshot = dashboard::analytical(state.store.as_ref(), &state.settings, &params).await?;
  Ok(Json(snapshot))
}

/// `GET /dashboard2/data`: the operational dashboard as JSON.
pub async fn dashboard2_data<S: RetailStore>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<OperationalParams>,
) -> Result<Json<OperationalSnapshot>, ApiError> {
  let snapshot = dashboard::operational(state.store.as_ref(), &state.settings, &params).await?;
  Ok(Json(snapshot))
}

#[cfg(test)]
mod tests;
