//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor that reports malformed bodies as [`AppError::InvalidRequest`].
///
/// Behaves like [`axum::Json`], but a rejected body produces the API's usual
/// `{"error": ...}` response with status 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
