/// Extractors with JSON error bodies
///
/// Axum's stock `Json` and `Path` extractors reject with plain-text 4xx
/// responses (422 for mistyped JSON). These wrappers reject with
/// [`ApiError`] instead, so every failure is a 400 with `{"error": ...}`.

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON body extractor and response
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
