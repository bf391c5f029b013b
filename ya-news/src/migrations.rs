use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(shared::users::MIGRATION),
        M::up(
            r#"
            CREATE TABLE news (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),

                title TEXT NOT NULL,
                text TEXT NOT NULL,
                date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX news_date ON news (date);
        "#
        ),
        M::up(
            r#"
            CREATE TABLE comments (
                id BLOB PRIMARY KEY CHECK(length(id) = 16) NOT NULL UNIQUE DEFAULT (uuid7_now()),
                news_id BLOB NOT NULL CHECK(length(news_id) = 16),
                author_id BLOB NOT NULL CHECK(length(author_id) = 16),

                text TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,

                FOREIGN KEY (news_id) REFERENCES news (id) ON DELETE CASCADE,
                FOREIGN KEY (author_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE INDEX comments_news_created ON comments (news_id, created_at);
        "#
        ),
    ]);
}
