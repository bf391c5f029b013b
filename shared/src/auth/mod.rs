mod backend;
mod errors;
mod forms;
mod routes;

use axum::Router;
use axum_login::AuthManagerLayerBuilder;
use tower_sessions::SessionStore;

pub use backend::{AuthBackend, AuthSession, Credentials};
pub use errors::{Error, Result};
pub use forms::{LoginForm, SignupForm};
pub use routes::router;

use crate::db::DB;

pub const LOGIN_URL: &str = "/auth/login/";

pub fn add_auth_layer(
    app: Router,
    session_layer: tower_sessions::SessionManagerLayer<impl SessionStore + Clone>,
    db: DB,
) -> Router {
    let auth_backend = AuthBackend::new(db);
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    app.layer(auth_layer)
}

pub mod middleware {
    use axum::{extract::Request, http::Uri, middleware::Next, response::Response};

    use crate::views::found;

    use super::*;

    /// Sends anonymous visitors to the login page, remembering where they were going.
    pub async fn protected_view(auth_session: AuthSession, url: Uri, request: Request, next: Next) -> Response {
        if auth_session.user.is_some() {
            return next.run(request).await;
        }

        let path = url.path();
        tracing::debug!(path, "anonymous request, redirecting to login");

        found(&format!("{LOGIN_URL}?next={path}"))
    }
}
