use rusqlite::Row;
use uuid::Uuid;

pub mod auth;
pub mod password;

pub type UserId = Uuid;

pub const MIGRATION: &str = r#"
    CREATE TABLE users (
        id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,

        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// argon2 PHC string
    pub password: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}
