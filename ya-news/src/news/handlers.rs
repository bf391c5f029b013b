use rusqlite::{params, Row};
use shared::{ctx::BaseParams, db, Error, Result};
use uuid::Uuid;

use super::{Comment, CreateComment, CreateNews, News, UpdateComment};

const NEWS_SELECT: &str = r#"SELECT n.id, n.title, n.text, n.date,
        (SELECT count(*) FROM comments c WHERE c.news_id = n.id)
    FROM news n"#;

const COMMENT_SELECT: &str = r#"SELECT c.id, c.news_id, c.author_id, u.username, c.text, c.created_at
    FROM comments c
    JOIN users u ON u.id = c.author_id"#;

impl<'a> TryFrom<&Row<'a>> for News {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            text: row.get(2)?,
            date: row.get(3)?,
            comment_count: row.get(4)?,
        })
    }
}

impl<'a> TryFrom<&Row<'a>> for Comment {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            news_id: row.get(1)?,
            author_id: row.get(2)?,
            author: row.get(3)?,
            text: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// The freshest `limit` news, newest first.
pub async fn find_home_news(limit: u32, BaseParams { db, .. }: BaseParams) -> Result<Vec<News>> {
    db.call(move |conn| {
        let news = conn
            .prepare(&format!("{NEWS_SELECT} ORDER BY n.date DESC LIMIT ?"))?
            .query_map(params![limit], |row| News::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(news)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn get_news(news_id: Uuid, BaseParams { db, .. }: BaseParams) -> Result<News> {
    db.call(move |conn| {
        conn.query_row(&format!("{NEWS_SELECT} WHERE n.id = ?"), params![news_id], |row| {
            News::try_from(row)
        })
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("News not found"))
    .map_err(Error::from)
}

pub async fn create_news(CreateNews { title, text, date }: CreateNews, BaseParams { db, .. }: BaseParams) -> Result<News> {
    let date = date.unwrap_or_else(chrono::Utc::now);
    db.call(move |conn| {
        let id: Uuid = conn.query_row(
            "INSERT INTO news (title, text, date) VALUES (?, ?, ?) RETURNING id",
            params![title, text, date],
            |row| row.get(0),
        )?;
        conn.query_row(&format!("{NEWS_SELECT} WHERE n.id = ?"), params![id], |row| {
            News::try_from(row)
        })
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

/// Oldest first.
pub async fn find_comments(news_id: Uuid, BaseParams { db, .. }: BaseParams) -> Result<Vec<Comment>> {
    db.call(move |conn| {
        let comments = conn
            .prepare(&format!("{COMMENT_SELECT} WHERE c.news_id = ? ORDER BY c.created_at, c.id"))?
            .query_map(params![news_id], |row| Comment::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn create_comment(
    news_id: Uuid,
    CreateComment { text }: CreateComment,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Comment> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        let id: Uuid = conn.query_row(
            "INSERT INTO comments (news_id, author_id, text, created_at) VALUES (?, ?, ?, ?) RETURNING id",
            params![news_id, author_id, text, chrono::Utc::now()],
            |row| row.get(0),
        )?;
        conn.query_row(&format!("{COMMENT_SELECT} WHERE c.id = ?"), params![id], |row| {
            Comment::try_from(row)
        })
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

/// Someone else's comment is reported as missing.
pub async fn get_own_comment(comment_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Comment> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        conn.query_row(
            &format!("{COMMENT_SELECT} WHERE c.id = ? AND c.author_id = ?"),
            params![comment_id, author_id],
            |row| Comment::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Comment not found"))
    .map_err(Error::from)
}

pub async fn update_comment(
    comment_id: Uuid,
    UpdateComment { text }: UpdateComment,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Comment> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        let id: Uuid = conn.query_row(
            "UPDATE comments SET text = ? WHERE id = ? AND author_id = ? RETURNING id",
            params![text, comment_id, author_id],
            |row| row.get(0),
        )?;
        conn.query_row(&format!("{COMMENT_SELECT} WHERE c.id = ?"), params![id], |row| {
            Comment::try_from(row)
        })
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Comment not found"))
    .map_err(Error::from)
}

pub async fn delete_comment(comment_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Comment> {
    let author_id = ctx.user_id()?;
    db.call(move |conn| {
        let tx = conn.transaction()?;
        let comment = tx.query_row(
            &format!("{COMMENT_SELECT} WHERE c.id = ? AND c.author_id = ?"),
            params![comment_id, author_id],
            |row| Comment::try_from(row),
        )?;
        tx.execute("DELETE FROM comments WHERE id = ?", params![comment_id])?;
        tx.commit()?;
        Ok(comment)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| e.not_found_message("Comment not found"))
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use shared::{
        ctx::{self, Ctx},
        testing::create_user,
    };

    use super::*;
    use crate::tests::init_test_db;

    fn base(db: &db::DB, user: Option<&shared::users::User>) -> BaseParams {
        BaseParams::new(db.clone(), Ctx::new(user.map(ctx::User::from)))
    }

    async fn news(db: &db::DB, title: &str, date: chrono::DateTime<Utc>) -> News {
        create_news(
            CreateNews {
                title: title.into(),
                text: "text".into(),
                date: Some(date),
            },
            base(db, None),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn home_news_limited_and_newest_first() {
        let db = init_test_db().await;
        let now = Utc::now();
        for i in 0..5 {
            news(&db, &format!("news {i}"), now - Duration::hours(i)).await;
        }

        let found = find_home_news(3, base(&db, None)).await.unwrap();

        let titles = found.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["news 0", "news 1", "news 2"]);
    }

    #[tokio::test]
    async fn comments_oldest_first_with_count() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "news", Utc::now()).await;

        for text in ["first", "second", "third"] {
            create_comment(item.id, CreateComment { text: text.into() }, base(&db, Some(&author)))
                .await
                .unwrap();
        }

        let comments = find_comments(item.id, base(&db, None)).await.unwrap();
        let texts = comments.iter().map(|c| c.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, ["first", "second", "third"]);
        assert!(comments.iter().all(|c| c.author == "author"));

        assert_eq!(get_news(item.id, base(&db, None)).await.unwrap().comment_count, 3);
    }

    #[tokio::test]
    async fn foreign_comment_is_not_found() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let reader = create_user(db.clone(), "reader").await;
        let item = news(&db, "news", Utc::now()).await;
        let comment = create_comment(item.id, CreateComment { text: "mine".into() }, base(&db, Some(&author)))
            .await
            .unwrap();

        let as_reader = || base(&db, Some(&reader));
        assert!(matches!(
            get_own_comment(comment.id, as_reader()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            update_comment(comment.id, UpdateComment { text: "hacked".into() }, as_reader()).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            delete_comment(comment.id, as_reader()).await,
            Err(Error::NotFound(_))
        ));

        let kept = get_own_comment(comment.id, base(&db, Some(&author))).await.unwrap();
        assert_eq!(kept.text, "mine");
    }

    #[tokio::test]
    async fn author_updates_and_deletes() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "news", Utc::now()).await;
        let comment = create_comment(item.id, CreateComment { text: "draft".into() }, base(&db, Some(&author)))
            .await
            .unwrap();

        let updated = update_comment(comment.id, UpdateComment { text: "final".into() }, base(&db, Some(&author)))
            .await
            .unwrap();
        assert_eq!(updated.text, "final");
        assert_eq!(updated.news_id, item.id);

        delete_comment(comment.id, base(&db, Some(&author))).await.unwrap();
        assert!(find_comments(item.id, base(&db, None)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_cannot_comment() {
        let db = init_test_db().await;
        let item = news(&db, "news", Utc::now()).await;

        let result = create_comment(item.id, CreateComment { text: "hi".into() }, base(&db, None)).await;

        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn missing_news() {
        let db = init_test_db().await;

        let result = get_news(Uuid::now_v7(), base(&db, None)).await;

        assert!(matches!(result, Err(Error::NotFound(message)) if message == "News not found"));
    }
}
