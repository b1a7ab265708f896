use axum::extract::{FromRequest, FromRequestParts};

use crate::error::RequestError;

/// `Json` whose rejections are answered with the failure envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(RequestError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejections are answered with the failure envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(RequestError))]
pub struct ApiPath<T>(pub T);
