//! Demo content for a fresh development database.

use chrono::{Duration, Utc};
use shared::{
    ctx::{BaseParams, Ctx},
    db::{self, DB},
    Result,
};

use super::{handlers::create_news, CreateNews};

const DEMO_NEWS: [(&str, &str); 3] = [
    (
        "Запущен новостной сайт",
        "Теперь все новости в одном месте. Читайте и оставляйте комментарии.",
    ),
    (
        "Комментарии проходят модерацию",
        "Грубые слова в комментариях не пропускаются.",
    ),
    (
        "Регистрация открыта",
        "Зарегистрируйтесь, чтобы обсуждать новости с другими читателями.",
    ),
];

/// Does nothing when any news already exist.
pub async fn seed(db: DB) -> Result<()> {
    let existing: u32 = db
        .call(|conn| {
            conn.query_row("SELECT count(*) FROM news", [], |row| row.get(0))
                .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)?;

    if existing > 0 {
        return Ok(());
    }

    let now = Utc::now();
    for (age, (title, text)) in (0i64..).zip(DEMO_NEWS) {
        create_news(
            CreateNews {
                title: title.into(),
                text: text.into(),
                date: Some(now - Duration::days(age)),
            },
            BaseParams::new(db.clone(), Ctx::new(None)),
        )
        .await?;
    }

    tracing::info!(count = DEMO_NEWS.len(), "seeded demo news");

    Ok(())
}
