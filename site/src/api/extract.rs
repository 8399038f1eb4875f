//! Body and path extractors whose rejections render as [`ApiErr`] JSON
//! instead of axum's plain-text defaults.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::ApiErr;

/// `axum::Json` with a `400 VALIDATION` rejection. Also usable as a response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiErr))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// `axum::extract::Path` with a `400 VALIDATION` rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiErr))]
pub struct Path<T>(pub T);
