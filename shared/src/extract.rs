use axum_macros::FromRequestParts;

use crate::Error;

/// `axum::extract::Path` whose rejection is a 404, like a lookup that found nothing.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);
