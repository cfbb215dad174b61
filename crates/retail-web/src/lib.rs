//! HTTP front end for the retail analytics store.
//!
//! Serves the server-rendered dashboards, the `/health` probe and the JSON
//! API (nested under `/api`) over any [`RetailStore`].

pub mod error;
pub mod pages;

pub use error::Error;
pub use pages::Templates;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  extract::State,
  routing::get,
};
use retail_api::{ApiError, DashboardSettings};
use retail_core::{model::StockMultiplier, report::HealthReport, store::RetailStore};
use retail_import::{DEFAULT_SOURCE_TABLE, ImportOptions, SourceTable};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `RETAIL__*`
/// environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  pub import:        ImportSettings,
  pub dashboard:     DashboardSettings,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_owned(),
      port:          5001,
      database_path: PathBuf::from("retail.db"),
      import:        ImportSettings::default(),
      dashboard:     DashboardSettings::default(),
    }
  }
}

/// The `[import]` config table.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImportSettings {
  pub source_table:     String,
  /// Database holding the source table. Defaults to `database_path`.
  pub source_database:  Option<PathBuf>,
  /// A CSV file to import instead of a source table.
  pub source_csv:       Option<PathBuf>,
  pub stock_multiplier: StockMultiplier,
}

impl Default for ImportSettings {
  fn default() -> Self {
    Self {
      source_table:     DEFAULT_SOURCE_TABLE.to_owned(),
      source_database:  None,
      source_csv:       None,
      stock_multiplier: StockMultiplier::default(),
    }
  }
}

impl ImportSettings {
  /// Where the flat sales table comes from. A CSV file wins over a source
  /// database.
  pub fn source(&self, database_path: &Path) -> SourceSpec {
    match &self.source_csv {
      Some(csv) => SourceSpec::Csv(csv.clone()),
      None => SourceSpec::Sqlite {
        path:  self
          .source_database
          .clone()
          .unwrap_or_else(|| database_path.to_path_buf()),
        table: self.source_table.clone(),
      },
    }
  }

  pub fn options(&self) -> ImportOptions {
    ImportOptions { stock_multiplier: self.stock_multiplier, ..Default::default() }
  }
}

/// A resolved import source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
  Csv(PathBuf),
  Sqlite { path: PathBuf, table: String },
}

impl SourceSpec {
  pub async fn load(&self) -> retail_import::Result<SourceTable> {
    match self {
      SourceSpec::Csv(path) => SourceTable::from_csv_path(path),
      SourceSpec::Sqlite { path, table } => SourceTable::from_sqlite(path, table).await,
    }
  }
}

impl std::fmt::Display for SourceSpec {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SourceSpec::Csv(path) => write!(f, "csv {}", path.display()),
      SourceSpec::Sqlite { path, table } => write!(f, "table {table} in {}", path.display()),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
#[derive(Clone)]
pub struct AppState<S: RetailStore> {
  pub store:     Arc<S>,
  pub config:    Arc<ServerConfig>,
  pub templates: Arc<Templates>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`]: pages, `/health` and `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RetailStore + Clone + Send + Sync + 'static,
{
  let api = retail_api::api_router(
    state.store.clone(),
    Arc::new(state.config.dashboard.clone()),
  );
  Router::new()
    .route("/",           get(pages::index::<S>))
    .route("/dashboard1", get(pages::dashboard1::<S>))
    .route("/dashboard2", get(pages::dashboard2::<S>))
    .route("/health",     get(health::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status: &'static str,
  #[serde(flatten)]
  pub report: HealthReport,
}

/// `GET /health`
async fn health<S: RetailStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<HealthResponse>, ApiError> {
  let store = state.store.as_ref();
  let report = HealthReport {
    counts:      store.table_counts().await.map_err(ApiError::store)?,
    date_range:  store.date_bounds().await.map_err(ApiError::store)?,
    total_sales: store.total_sales().await.map_err(ApiError::store)?,
  };
  Ok(Json(HealthResponse { status: "ok", report }))
}
