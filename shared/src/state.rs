use axum::extract::FromRef;
use serde::Serialize;

use crate::{db::DB, views::Views};

/// Per-site settings the shared pages need.
#[derive(Debug, Clone, Serialize)]
pub struct Site {
    pub name: &'static str,
    pub home_url: &'static str,
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub views: Views,
    pub site: Site,
}
