use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(shared::users::MIGRATION),
        M::up(
            r#"
            CREATE TABLE notes (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
                author_id BLOB NOT NULL CHECK(length(author_id) = 16),

                title TEXT NOT NULL,
                text TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE CHECK(length(slug) <= 100),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,

                FOREIGN KEY (author_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE INDEX notes_author ON notes (author_id, created_at);
        "#
        ),
    ]);
}
