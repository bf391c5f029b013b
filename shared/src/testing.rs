//! Helpers for HTTP tests of the sites.

use std::sync::OnceLock;

use axum::{http::StatusCode, middleware, routing::get, Router};
use axum_test::{TestServer, TestServerBuilder};
use minijinja::Environment;
use rusqlite_migration::{Migrations, M};

use crate::{
    app::{create, AppParams},
    auth,
    ctx::Ctx,
    db::{self, DB},
    state::{AppState, Site},
    users::{
        self,
        auth::{create as create_user_record, CreateUserParameters},
    },
};

pub const TEST_PASSWORD: &str = "password123";

pub fn server(app: Router) -> TestServer {
    let config = TestServerBuilder::new().save_cookies().mock_transport().into_config();

    TestServer::new_with_config(app, config).unwrap()
}

pub async fn create_user(db: DB, username: &str) -> users::User {
    create_user_record(
        db,
        CreateUserParameters {
            username: username.into(),
            password: TEST_PASSWORD.into(),
        },
    )
    .await
    .unwrap()
}

/// Logs the server's cookie jar in as `username`.
pub async fn login(server: &TestServer, username: &str) {
    let response = server
        .post(auth::LOGIN_URL)
        .form(&[("username", username), ("password", TEST_PASSWORD)])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND, "login as {username} failed");
}

pub async fn count(db: &DB, table: &'static str) -> u32 {
    db.call(move |conn| {
        conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))
            .map_err(|e| e.into())
    })
    .await
    .unwrap()
}

static MIGRATIONS: OnceLock<Migrations<'static>> = OnceLock::new();

/// In-memory database holding only the users table.
pub async fn init_test_db() -> DB {
    let migrations = MIGRATIONS.get_or_init(|| Migrations::new(vec![M::up(users::MIGRATION)]));
    db::init_test_db(migrations).await.unwrap()
}

/// A bare site with one public and one login-only page.
pub async fn test_server(db: DB) -> TestServer {
    let app = create(AppParams {
        db,
        site: Site {
            name: "test",
            home_url: "/",
        },
        session_days: 1,
        templates: |env: &mut Environment<'static>| env.add_template("base.html", "{% block content %}{% endblock %}"),
        router: test_router,
    })
    .await
    .unwrap();

    server(app)
}

fn test_router(state: AppState) -> Router {
    let private = Router::new()
        .route("/private/", get(private))
        .route_layer(middleware::from_fn(auth::middleware::protected_view));

    Router::new()
        .route("/", get(|| async { "home" }))
        .merge(private)
        .with_state(state)
}

async fn private(ctx: Ctx) -> String {
    format!("hello {}", ctx.user.map(|u| u.username).unwrap_or_default())
}
