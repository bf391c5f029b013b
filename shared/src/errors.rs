use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{auth, db};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),

    // auth
    #[error("unauthorized")]
    Unauthorized,

    // a malformed identifier is indistinguishable from a missing record
    #[error("not_found")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    DB(db::Error),
    #[error(transparent)]
    Auth(auth::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl From<db::Error> for Error {
    fn from(error: db::Error) -> Self {
        match error {
            db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

impl From<auth::Error> for Error {
    fn from(error: auth::Error) -> Self {
        match error {
            auth::Error::DB(error) => Self::from(error),
            error => Self::Auth(error),
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(error: minijinja::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: Option<String>,
    pub status: u16,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let (error, status, message) = match error {
            Error::NotFound(message) => ("not_found", StatusCode::NOT_FOUND, message.clone()),
            Error::PathValidation(_) => ("not_found", StatusCode::NOT_FOUND, "Not found".into()),
            Error::Unauthorized => ("unauthorized", StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            _ => ("unexpected", StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error".into()),
        };

        Self {
            error,
            message: Some(message),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.as_ref());
        let status = StatusCode::from_u16(error_res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = status;
        res
    }
}

/// Logs errors that handlers turned into responses.
pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if let Some(error) = response.extensions().get::<Arc<Error>>().map(Arc::as_ref) {
        match error {
            Error::NotFound(_) | Error::PathValidation(_) => tracing::debug!("{:?}", error),
            error => tracing::error!("{:?}", error),
        }
    }

    response
}
