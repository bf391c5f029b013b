use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use serde::Serialize;

use crate::{
    auth::AuthSession,
    db::DB,
    users::{self, UserId},
    Error, Result,
};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

/// The acting user as templates and handlers see it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl From<&users::User> for User {
    fn from(user: &users::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub user: Option<User>,
}

impl Ctx {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn get_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// For handlers behind the login middleware.
    pub fn user_id(&self) -> Result<UserId> {
        self.get_user_id().ok_or(Error::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let user = parts
            .extract::<AuthSession>()
            .await
            .map_err(|e| e.into_response())?
            .user
            .as_ref()
            .map(User::from);

        Ok(Self { user })
    }
}
