use rusqlite::{params, OptionalExtension, Row};
use shared::{ctx::BaseParams, db, Error, Result};
use uuid::Uuid;

use super::{Note, NoteData};

const NOTE_SELECT: &str = "SELECT id, title, text, slug, author_id, created_at FROM notes";

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            slug: row.get(3)?,
            author_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// The acting user's notes, oldest first.
pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        let notes = conn
            .prepare(&format!("{NOTE_SELECT} WHERE author_id = ? ORDER BY created_at, id"))?
            .query_map(params![author_id], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

/// Notes of other users are reported as missing.
pub async fn get_note(slug: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        conn.query_row(
            &format!("{NOTE_SELECT} WHERE slug = ? AND author_id = ?"),
            params![slug, author_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
    .map_err(Error::from)
}

/// Checks every author's notes; `exclude` skips the note being edited.
pub async fn slug_taken(slug: String, exclude: Option<Uuid>, db: db::DB) -> Result<bool> {
    db.call(move |conn| {
        let found = conn
            .query_row(
                "SELECT 1 FROM notes WHERE slug = ?1 AND (?2 IS NULL OR id != ?2)",
                params![slug, exclude],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn create_note(NoteData { title, text, slug }: NoteData, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        conn.query_row(
            r#"INSERT INTO notes (title, text, slug, author_id, created_at) VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, text, slug, author_id, created_at"#,
            params![title, text, slug, author_id, chrono::Utc::now()],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn update_note(
    current_slug: String,
    NoteData { title, text, slug }: NoteData,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        conn.query_row(
            r#"UPDATE notes SET title = ?, text = ?, slug = ?
            WHERE slug = ? AND author_id = ?
            RETURNING id, title, text, slug, author_id, created_at"#,
            params![title, text, slug, current_slug, author_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
    .map_err(Error::from)
}

pub async fn delete_note(slug: String, BaseParams { db, ctx }: BaseParams) -> Result<Uuid> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        conn.query_row(
            "DELETE FROM notes WHERE slug = ? AND author_id = ? RETURNING id",
            params![slug, author_id],
            |row| row.get(0),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Note not found"))
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use shared::{
        ctx::{self, Ctx},
        testing::create_user,
        users::User,
    };

    use super::*;
    use crate::tests::init_test_db;

    fn base(db: &db::DB, user: &User) -> BaseParams {
        BaseParams::new(db.clone(), Ctx::new(Some(ctx::User::from(user))))
    }

    fn data(title: &str, slug: &str) -> NoteData {
        NoteData {
            title: title.into(),
            text: "Текст заметки".into(),
            slug: slug.into(),
        }
    }

    #[tokio::test]
    async fn notes_are_scoped_to_author() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let another = create_user(db.clone(), "another").await;

        create_note(data("Заметка автора", "author-note"), base(&db, &author)).await.unwrap();
        create_note(data("Чужая заметка", "another-note"), base(&db, &another)).await.unwrap();
        create_note(data("Еще одна заметка", "author-note2"), base(&db, &author)).await.unwrap();

        let slugs = find_notes(base(&db, &author))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.slug)
            .collect::<Vec<_>>();
        assert_eq!(slugs, ["author-note", "author-note2"]);

        assert!(matches!(
            get_note("another-note".into(), base(&db, &author)).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn slug_taken_across_authors() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let note = create_note(data("Заметка", "taken"), base(&db, &author)).await.unwrap();

        assert!(slug_taken("taken".into(), None, db.clone()).await.unwrap());
        assert!(!slug_taken("taken".into(), Some(note.id), db.clone()).await.unwrap());
        assert!(!slug_taken("free".into(), None, db.clone()).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_slug_violates_constraint() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let another = create_user(db.clone(), "another").await;
        create_note(data("Первая", "duplicate-slug"), base(&db, &author)).await.unwrap();

        let result = create_note(data("Вторая", "duplicate-slug"), base(&db, &another)).await;

        assert!(matches!(result, Err(Error::DB(db::Error::UniqueViolation(_)))));
    }

    #[tokio::test]
    async fn foreign_note_is_untouchable() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let another = create_user(db.clone(), "another").await;
        create_note(data("Чужая заметка", "foreign-note"), base(&db, &another)).await.unwrap();

        let updated = update_note("foreign-note".into(), data("Взломанная", "hacked-note"), base(&db, &author)).await;
        assert!(matches!(updated, Err(Error::NotFound(_))));

        let deleted = delete_note("foreign-note".into(), base(&db, &author)).await;
        assert!(matches!(deleted, Err(Error::NotFound(_))));

        let kept = get_note("foreign-note".into(), base(&db, &another)).await.unwrap();
        assert_eq!(kept.title, "Чужая заметка");
    }

    #[tokio::test]
    async fn update_and_delete_own() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        create_note(data("Моя заметка", "my-note"), base(&db, &author)).await.unwrap();

        let updated = update_note("my-note".into(), data("Обновленная заметка", "updated-note"), base(&db, &author))
            .await
            .unwrap();
        assert_eq!(updated.slug, "updated-note");
        assert_eq!(updated.title, "Обновленная заметка");

        delete_note("updated-note".into(), base(&db, &author)).await.unwrap();
        assert!(find_notes(base(&db, &author)).await.unwrap().is_empty());
    }
}
