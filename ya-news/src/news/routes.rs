use axum::{
    middleware,
    response::Response,
    routing::{get, post},
    Form, Router,
};
use minijinja::context;
use shared::{
    auth::middleware::protected_view,
    ctx::BaseParams,
    extract::Path,
    forms::FormErrors,
    state::AppState,
    views::{found, Views},
    Result,
};
use uuid::Uuid;

use crate::config;

use super::{
    forms::CommentForm,
    handlers::{create_comment, delete_comment, find_comments, find_home_news, get_news, get_own_comment, update_comment},
    CreateComment, UpdateComment,
};

pub fn router(state: AppState) -> Router {
    let comments = Router::new()
        .route("/edit_comment/{id}/", get(edit_comment_view).post(edit_comment))
        .route("/delete_comment/{id}/", get(delete_comment_view).post(remove_comment))
        .route_layer(middleware::from_fn(protected_view));

    Router::new()
        .route("/", get(home))
        .route(
            "/news/{id}/",
            get(news_detail).merge(post(add_comment).route_layer(middleware::from_fn(protected_view))),
        )
        .merge(comments)
        .with_state(state)
}

fn comments_url(news_id: Uuid) -> String {
    format!("/news/{news_id}/#comments")
}

async fn home(view: Views, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let news = find_home_news(config().news_count_on_home_page, params).await?;

    Ok(view.response("home.html", context! { news => news, user => user }))
}

async fn news_detail(view: Views, Path(news_id): Path<Uuid>, params: BaseParams) -> Result<Response> {
    render_detail(&view, news_id, params, CommentForm::default(), FormErrors::default()).await
}

async fn render_detail(
    view: &Views,
    news_id: Uuid,
    params: BaseParams,
    form: CommentForm,
    errors: FormErrors,
) -> Result<Response> {
    let user = params.ctx.user.clone();
    let news = get_news(news_id, params.clone()).await?;
    let comments = find_comments(news_id, params).await?;

    Ok(view.response(
        "detail.html",
        context! { news => news, comments => comments, form => form, errors => errors, user => user },
    ))
}

async fn add_comment(
    view: Views,
    Path(news_id): Path<Uuid>,
    params: BaseParams,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            tracing::debug!(%news_id, ?errors, "comment rejected");
            return render_detail(&view, news_id, params, form, errors).await;
        }
    };

    // a comment on a missing news item is a 404, not a foreign key failure
    get_news(news_id, params.clone()).await?;
    let comment = create_comment(news_id, CreateComment { text }, params).await?;
    tracing::info!(comment_id = %comment.id, %news_id, "comment created");

    Ok(found(&comments_url(news_id)))
}

async fn edit_comment_view(view: Views, Path(comment_id): Path<Uuid>, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let comment = get_own_comment(comment_id, params).await?;
    let form = CommentForm {
        text: comment.text.clone(),
    };

    Ok(view.response(
        "comment_edit.html",
        context! { comment => comment, form => form, errors => FormErrors::default(), user => user },
    ))
}

async fn edit_comment(
    view: Views,
    Path(comment_id): Path<Uuid>,
    params: BaseParams,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            let user = params.ctx.user.clone();
            let comment = get_own_comment(comment_id, params).await?;
            tracing::debug!(%comment_id, ?errors, "comment edit rejected");

            return Ok(view.response(
                "comment_edit.html",
                context! { comment => comment, form => form, errors => errors, user => user },
            ));
        }
    };

    let comment = update_comment(comment_id, UpdateComment { text }, params).await?;
    tracing::info!(%comment_id, "comment updated");

    Ok(found(&comments_url(comment.news_id)))
}

async fn delete_comment_view(view: Views, Path(comment_id): Path<Uuid>, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let comment = get_own_comment(comment_id, params).await?;

    Ok(view.response("comment_delete.html", context! { comment => comment, user => user }))
}

async fn remove_comment(Path(comment_id): Path<Uuid>, params: BaseParams) -> Result<Response> {
    let comment = delete_comment(comment_id, params).await?;
    tracing::info!(%comment_id, "comment deleted");

    Ok(found(&comments_url(comment.news_id)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use shared::{
        ctx::{self, Ctx},
        db::DB,
        testing::{count, create_user, login},
        users::User,
    };

    use super::*;
    use crate::{
        news::{forms::WARNING, handlers::create_news, Comment, CreateNews, News},
        tests::{init_test_db, test_server},
    };

    fn base(db: &DB, user: Option<&User>) -> BaseParams {
        BaseParams::new(db.clone(), Ctx::new(user.map(ctx::User::from)))
    }

    async fn news(db: &DB, title: &str) -> News {
        create_news(
            CreateNews {
                title: title.into(),
                text: "Просто текст.".into(),
                date: None,
            },
            base(db, None),
        )
        .await
        .unwrap()
    }

    async fn comment(db: &DB, news: &News, author: &User, text: &str) -> Comment {
        create_comment(news.id, CreateComment { text: text.into() }, base(db, Some(author)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn public_pages() {
        let db = init_test_db().await;
        let item = news(&db, "Заголовок").await;
        let server = test_server(db).await;

        for url in ["/".to_string(), format!("/news/{}/", item.id), "/auth/login/".into(), "/auth/signup/".into()] {
            assert_eq!(server.get(&url).await.status_code(), StatusCode::OK, "{url}");
        }
    }

    #[tokio::test]
    async fn missing_or_malformed_news_is_not_found() {
        let server = test_server(init_test_db().await).await;

        let missing = format!("/news/{}/", Uuid::now_v7());
        assert_eq!(server.get(&missing).await.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(server.get("/news/42/").await.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn home_page_limit_and_order() {
        let db = init_test_db().await;
        let now = Utc::now();
        for i in 0..=config().news_count_on_home_page {
            create_news(
                CreateNews {
                    title: format!("Новость {i:02}"),
                    text: "Просто текст.".into(),
                    date: Some(now - Duration::days(i.into())),
                },
                base(&db, None),
            )
            .await
            .unwrap();
        }
        let server = test_server(db).await;

        let page = server.get("/").await.text();

        let shown = config().news_count_on_home_page as usize;
        assert_eq!(page.matches(r#"class="news-item""#).count(), shown);
        let positions = (0..shown)
            .map(|i| page.find(&format!("Новость {i:02}")).unwrap())
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!page.contains(&format!("Новость {shown:02}")));
    }

    #[tokio::test]
    async fn comments_in_chronological_order() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "Комментатор").await;
        let item = news(&db, "Заголовок").await;
        for i in 0..3 {
            comment(&db, &item, &author, &format!("Текст {i}")).await;
        }
        let server = test_server(db).await;

        let page = server.get(&format!("/news/{}/", item.id)).await.text();

        let first = page.find("Текст 0").unwrap();
        let second = page.find("Текст 1").unwrap();
        let third = page.find("Текст 2").unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn comment_form_only_for_users() {
        let db = init_test_db().await;
        create_user(db.clone(), "reader").await;
        let item = news(&db, "Заголовок").await;
        let server = test_server(db).await;
        let url = format!("/news/{}/", item.id);

        assert!(!server.get(&url).await.text().contains(r#"id="comment-form""#));

        login(&server, "reader").await;
        assert!(server.get(&url).await.text().contains(r#"id="comment-form""#));
    }

    #[tokio::test]
    async fn anonymous_cannot_comment() {
        let db = init_test_db().await;
        let item = news(&db, "Заголовок").await;
        let server = test_server(db.clone()).await;
        let url = format!("/news/{}/", item.id);

        let response = server.post(&url).form(&[("text", "Текст комментария")]).await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), format!("/auth/login/?next={url}"));
        assert_eq!(count(&db, "comments").await, 0);
    }

    #[tokio::test]
    async fn user_can_comment() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "Заголовок").await;
        let server = test_server(db.clone()).await;
        login(&server, "author").await;

        let response = server
            .post(&format!("/news/{}/", item.id))
            .form(&[("text", "Текст комментария")])
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), comments_url(item.id));

        let comments = find_comments(item.id, base(&db, None)).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Текст комментария");
        assert_eq!(comments[0].author_id, author.id);
    }

    #[tokio::test]
    async fn bad_words_are_rejected() {
        let db = init_test_db().await;
        create_user(db.clone(), "author").await;
        let item = news(&db, "Заголовок").await;
        let server = test_server(db.clone()).await;
        login(&server, "author").await;

        let response = server
            .post(&format!("/news/{}/", item.id))
            .form(&[("text", "Какой-то текст, редиска, еще текст")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(WARNING));
        assert_eq!(count(&db, "comments").await, 0);
    }

    #[tokio::test]
    async fn author_edits_and_deletes_comment() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "Заголовок").await;
        let own = comment(&db, &item, &author, "Текст комментария").await;
        let server = test_server(db.clone()).await;
        login(&server, "author").await;

        let edit_url = format!("/edit_comment/{}/", own.id);
        assert_eq!(server.get(&edit_url).await.status_code(), StatusCode::OK);

        let response = server.post(&edit_url).form(&[("text", "Обновлённый комментарий")]).await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), comments_url(item.id));
        let edited = get_own_comment(own.id, base(&db, Some(&author))).await.unwrap();
        assert_eq!(edited.text, "Обновлённый комментарий");

        let delete_url = format!("/delete_comment/{}/", own.id);
        assert_eq!(server.get(&delete_url).await.status_code(), StatusCode::OK);

        let response = server.post(&delete_url).await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), comments_url(item.id));
        assert_eq!(count(&db, "comments").await, 0);
    }

    #[tokio::test]
    async fn edit_is_moderated() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "Заголовок").await;
        let own = comment(&db, &item, &author, "Текст комментария").await;
        let server = test_server(db.clone()).await;
        login(&server, "author").await;

        let response = server
            .post(&format!("/edit_comment/{}/", own.id))
            .form(&[("text", "Вот негодяй!")])
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains(WARNING));
        let kept = get_own_comment(own.id, base(&db, Some(&author))).await.unwrap();
        assert_eq!(kept.text, "Текст комментария");
    }

    #[tokio::test]
    async fn reader_cannot_touch_foreign_comment() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        create_user(db.clone(), "reader").await;
        let item = news(&db, "Заголовок").await;
        let own = comment(&db, &item, &author, "Текст комментария").await;
        let server = test_server(db.clone()).await;
        login(&server, "reader").await;

        for url in [format!("/edit_comment/{}/", own.id), format!("/delete_comment/{}/", own.id)] {
            assert_eq!(server.get(&url).await.status_code(), StatusCode::NOT_FOUND, "{url}");
        }

        let response = server
            .post(&format!("/edit_comment/{}/", own.id))
            .form(&[("text", "Чужой текст")])
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = server.post(&format!("/delete_comment/{}/", own.id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let kept = get_own_comment(own.id, base(&db, Some(&author))).await.unwrap();
        assert_eq!(kept.text, "Текст комментария");
    }

    #[tokio::test]
    async fn anonymous_redirected_from_comment_pages() {
        let db = init_test_db().await;
        let author = create_user(db.clone(), "author").await;
        let item = news(&db, "Заголовок").await;
        let own = comment(&db, &item, &author, "Текст комментария").await;
        let server = test_server(db).await;

        for url in [format!("/edit_comment/{}/", own.id), format!("/delete_comment/{}/", own.id)] {
            let response = server.get(&url).await;

            assert_eq!(response.status_code(), StatusCode::FOUND);
            assert_eq!(response.header("location"), format!("/auth/login/?next={url}"));
        }
    }
}
