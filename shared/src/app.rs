use axum::{middleware, Extension, Router};
use minijinja::Environment;
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

use crate::{
    auth,
    db::DB,
    errors::{self, on_error},
    state::{AppState, Site},
    views::{self, Views},
};

pub struct AppParams<Templates, Router>
where
    Templates: FnOnce(&mut Environment<'static>) -> Result<(), minijinja::Error>,
    Router: FnOnce(AppState) -> axum::Router,
{
    pub db: DB,
    pub site: Site,
    pub session_days: i64,
    pub templates: Templates,
    pub router: Router,
}

/// Wires a site router together with the auth pages, sessions and the shared layers.
pub async fn create<T, R>(
    AppParams {
        db,
        site,
        session_days,
        templates,
        router,
    }: AppParams<T, R>,
) -> errors::Result<Router>
where
    T: FnOnce(&mut Environment<'static>) -> Result<(), minijinja::Error>,
    R: FnOnce(AppState) -> Router,
{
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(session_days)));

    let mut env = Environment::new();
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
    views::add_templates(&mut env)?;
    templates(&mut env)?;

    let state = AppState {
        conn: db.clone(),
        views: Views::new(env),
        site,
    };

    let app = Router::new()
        .merge(auth::router(state.clone()))
        .merge(router(state.clone()))
        .layer(Extension(db));

    let app = auth::add_auth_layer(app, session_layer, state.conn.clone());

    Ok(app.layer(middleware::from_fn(on_error)))
}
