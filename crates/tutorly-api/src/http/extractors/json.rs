//! JSON request body extractor whose rejection is an [`AppError`], so a
//! malformed or incomplete body gets the usual `{ message, code }` JSON.

use axum::extract::FromRequest;

use crate::http::error::AppError;

/// Drop-in for `axum::Json` on the request side.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
