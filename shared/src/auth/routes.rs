use axum::{
    extract::{Query, State},
    response::Response,
    routing::{get, post},
    Form, Router,
};
use minijinja::context;
use serde::Deserialize;

use crate::{
    ctx::{BaseParams, Ctx},
    db,
    forms::FormErrors,
    state::{AppState, Site},
    users::auth::{create, username_taken, CreateUserParameters},
    views::{found, Views},
    Error, Result,
};

use super::{
    backend::{AuthSession, Credentials},
    forms::{LoginForm, SignupForm, USERNAME_TAKEN},
};

#[derive(Deserialize)]
pub struct Next {
    pub next: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login/", get(login_view).post(login))
        .route("/auth/logout/", post(logout))
        .route("/auth/signup/", get(signup_view).post(signup))
        .with_state(state)
}

/// Only same-site paths are followed after login.
fn safe_next(next: Option<String>) -> Option<String> {
    next.filter(|next| next.starts_with('/') && !next.starts_with("//") && !next.contains('\\'))
}

async fn login_view(view: Views, ctx: Ctx, Query(Next { next }): Query<Next>) -> Response {
    let form = LoginForm {
        next: safe_next(next),
        ..Default::default()
    };

    view.response("login.html", context! { form => form, user => ctx.user })
}

async fn login(
    mut auth_session: AuthSession,
    view: Views,
    State(site): State<Site>,
    Query(Next { next: query_next }): Query<Next>,
    Form(mut form): Form<LoginForm>,
) -> Result<Response> {
    form.next = safe_next(form.next.take().or(query_next));

    if let Err(errors) = form.validate() {
        return Ok(view.response("login.html", context! { form => form, errors => errors }));
    }

    let credentials = Credentials {
        username: form.username.trim().to_owned(),
        password: form.password.clone(),
    };

    let Some(user) = auth_session.authenticate(credentials).await.map_err(super::Error::from)? else {
        tracing::debug!(username = %form.username, "invalid credentials");
        let errors = LoginForm::invalid_credentials();
        return Ok(view.response("login.html", context! { form => form, errors => errors }));
    };

    auth_session.login(&user).await.map_err(super::Error::from)?;

    Ok(found(form.next.as_deref().unwrap_or(site.home_url)))
}

async fn logout(mut auth_session: AuthSession, State(site): State<Site>) -> Result<Response> {
    if let Some(user) = auth_session.logout().await.map_err(super::Error::from)? {
        tracing::info!(user_id = %user.id, "logged out");
    }

    Ok(found(site.home_url))
}

async fn signup_view(view: Views, ctx: Ctx) -> Response {
    view.response("signup.html", context! { form => SignupForm::default(), user => ctx.user })
}

async fn signup(
    view: Views,
    State(site): State<Site>,
    BaseParams { db, ctx }: BaseParams,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let render = |errors: FormErrors| {
        view.response(
            "signup.html",
            context! { form => &form, errors => errors, user => &ctx.user },
        )
    };

    if let Err(errors) = form.validate() {
        return Ok(render(errors));
    }

    let username = form.username.trim().to_owned();
    if username_taken(db.clone(), username.clone()).await? {
        return Ok(render(FormErrors::single("username", USERNAME_TAKEN)));
    }

    let created = create(
        db,
        CreateUserParameters {
            username,
            password: form.password1.clone(),
        },
    )
    .await;

    match created {
        Ok(_) => Ok(found(site.home_url)),
        // lost a race with a concurrent signup
        Err(Error::DB(db::Error::UniqueViolation(_))) => Ok(render(FormErrors::single("username", USERNAME_TAKEN))),
        Err(error) => Err(error),
    }
}
