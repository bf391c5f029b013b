use rusqlite::{named_params, params};

use crate::{
    db::{self, DB},
    Error, Result,
};

use super::{password, User, UserId};

const USER_COLUMNS: &str = "id, username, password, created_at";

#[derive(Clone)]
pub struct CreateUserParameters {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct GetUserByUsernameParameters {
    pub username: String,
}

pub async fn create(db: DB, CreateUserParameters { username, password }: CreateUserParameters) -> Result<User> {
    let password = tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))?
        .map_err(|e| Error::Unexpected(e.to_string()))?;

    let user = db
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO users (username, password, created_at) VALUES (:username, :password, :created_at)
                    RETURNING {USER_COLUMNS}"
                ),
                named_params! {
                    ":username": username,
                    ":password": password,
                    ":created_at": chrono::Utc::now(),
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user created");

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<User> {
    let user_id = args.user_id;
    db.call(move |conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            params![args.user_id],
            |r| User::try_from(r),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))
}

pub async fn find_one_by_username(db: DB, args: GetUserByUsernameParameters) -> db::Result<User> {
    let username = args.username.to_owned();
    db.call(move |conn| {
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"),
            params![args.username],
            |r| User::try_from(r),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message(format!("User '{}' not found", username)))
}

pub async fn username_taken(db: DB, username: String) -> db::Result<bool> {
    db.call(move |conn| {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)",
            params![username],
            |r| r.get(0),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}
