//! Building blocks shared by the news and notes sites: storage, users and
//! authentication, form errors, template views and request tracing.

pub mod app;
pub mod auth;
pub mod ctx;
pub mod db;
pub mod errors;
pub mod extract;
pub mod forms;
pub mod state;
pub mod tracing;
pub mod users;
pub mod views;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use errors::{Error, Result};
