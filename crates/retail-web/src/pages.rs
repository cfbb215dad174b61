//! Server-rendered dashboard pages.
//!
//! | Method | Path | Template |
//! |--------|------|----------|
//! | `GET`  | `/`           | `index.html` |
//! | `GET`  | `/dashboard1` | `dashboard1.html`, analytical filters |
//! | `GET`  | `/dashboard2` | `dashboard2.html`, operational params |

use axum::{
  extract::{Query, State},
  response::Html,
};
use minijinja::{Environment, context};
use retail_api::{
  ApiError,
  dashboard::{self, AnalyticalParams, OperationalParams},
};
use retail_core::store::RetailStore;
use serde::Serialize;

use crate::{AppState, error::Error};

const TEMPLATES: [(&str, &str); 4] = [
  ("base.html", include_str!("../templates/base.html")),
  ("index.html", include_str!("../templates/index.html")),
  ("dashboard1.html", include_str!("../templates/dashboard1.html")),
  ("dashboard2.html", include_str!("../templates/dashboard2.html")),
];

/// The embedded template set. `.html` templates are autoescaped.
pub struct Templates {
  env: Environment<'static>,
}

impl Templates {
  pub fn new() -> Result<Self, Error> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
      env.add_template(name, source)?;
    }
    Ok(Self { env })
  }

  pub fn render<C: Serialize>(&self, name: &str, ctx: C) -> Result<Html<String>, Error> {
    let template = self.env.get_template(name)?;
    Ok(Html(template.render(ctx)?))
  }
}

/// `GET /`
pub async fn index<S: RetailStore>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error> {
  let counts = state.store.table_counts().await.map_err(ApiError::store)?;
  let date_bounds = state.store.date_bounds().await.map_err(ApiError::store)?;
  state
    .templates
    .render("index.html", context! { page => "index", counts, date_bounds })
}

/// `GET /dashboard1`
pub async fn dashboard1<S: RetailStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<AnalyticalParams>,
) -> Result<Html<String>, Error> {
  let data =
    dashboard::analytical(state.store.as_ref(), &state.config.dashboard, &params).await?;
  tracing::debug!(has_data = data.has_data, "rendering analytical dashboard");
  state
    .templates
    .render("dashboard1.html", context! { page => "dashboard1", data })
}

/// `GET /dashboard2`
pub async fn dashboard2<S: RetailStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<OperationalParams>,
) -> Result<Html<String>, Error> {
  let data =
    dashboard::operational(state.store.as_ref(), &state.config.dashboard, &params).await?;
  tracing::debug!(has_data = data.has_data, "rendering operational dashboard");
  state
    .templates
    .render("dashboard2.html", context! { page => "dashboard2", data })
}
