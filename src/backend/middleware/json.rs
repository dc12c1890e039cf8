//! JSON body extractor whose rejections use the API error format
//!
//! axum's own `Json` rejects malformed bodies with 422 and a plain-text
//! message. `ApiJson` turns every rejection into a `BackendError` 400.

use axum::extract::FromRequest;

use crate::backend::error::BackendError;

#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);
