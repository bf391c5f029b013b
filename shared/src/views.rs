use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, Error};

#[derive(Debug, Clone)]
pub struct Views {
    pub env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new(env: Environment<'static>) -> Self {
        let engine = Arc::new(env);
        Self { env: engine }
    }
}

impl Views {
    pub fn response<D: serde::Serialize>(&self, key: &str, data: D) -> Response {
        match self.render(key, data) {
            Ok(x) => Html(x).into_response(),
            Err(err) => {
                tracing::error!("failed to render {key}: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }

    fn render<D: serde::Serialize>(&self, key: &str, data: D) -> Result<String, Error> {
        let template = self.env.get_template(key)?;
        let rendered = template.render(&data)?;

        Ok(rendered)
    }
}

impl<ApplicationState> FromRequestParts<ApplicationState> for Views
where
    Self: FromRef<ApplicationState>,
    ApplicationState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_: &mut Parts, state: &ApplicationState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_ref(state))
    }
}

/// `302 Found`, the status browsers and the original site use for post/redirect/get.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Templates every site needs: form helpers and the auth pages.
pub fn add_templates(env: &mut Environment<'static>) -> Result<(), Error> {
    env.add_template("forms.html", include_str!("../templates/forms.html"))?;
    env.add_template("login.html", include_str!("../templates/login.html"))?;
    env.add_template("signup.html", include_str!("../templates/signup.html"))?;
    Ok(())
}
