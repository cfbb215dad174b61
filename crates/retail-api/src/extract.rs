//! Query extraction whose failures render as [`ApiError`] JSON bodies.

use axum::extract::{FromRequestParts, Query};

use crate::error::ApiError;

/// [`Query`] with an [`ApiError`] rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
