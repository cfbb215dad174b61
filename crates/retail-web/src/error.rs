//! Error types and axum `IntoResponse` implementation for HTML pages.

use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use minijinja::HtmlEscape;
use retail_api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Api(#[from] ApiError),
  #[error("template error: {0}")]
  Template(#[from] minijinja::Error),
}

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Error::Api(e) => e.status(),
      Error::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "page rendering failed");
    }
    let body = format!(
      "<!doctype html><html><head><title>Error</title></head><body>\
       <h1>{} {}</h1><p>{}</p><p><a href=\"/\">Back to dashboards</a></p></body></html>",
      status.as_u16(),
      status.canonical_reason().unwrap_or("Error"),
      HtmlEscape(&self.to_string()),
    );
    (status, Html(body)).into_response()
  }
}
