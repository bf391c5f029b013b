use axum::{middleware, response::Response, routing::get, Form, Router};
use minijinja::context;
use shared::{
    auth::middleware::protected_view,
    ctx::{BaseParams, Ctx},
    db,
    extract::Path,
    forms::FormErrors,
    state::AppState,
    views::{found, Views},
    Error, Result,
};

use super::{
    forms::{slug_warning, NoteForm},
    handlers::{create_note, delete_note, find_notes, get_note, slug_taken, update_note},
};

pub const DONE_URL: &str = "/done/";

pub fn router(state: AppState) -> Router {
    let notes = Router::new()
        .route("/notes/", get(list))
        .route("/done/", get(done))
        .route("/add/", get(add_view).post(add))
        .route("/note/{slug}/", get(detail))
        .route("/edit/{slug}/", get(edit_view).post(edit))
        .route("/delete/{slug}/", get(delete_view).post(remove))
        .route_layer(middleware::from_fn(protected_view));

    Router::new().route("/", get(home)).merge(notes).with_state(state)
}

async fn home(view: Views, ctx: Ctx) -> Response {
    view.response("home.html", context! { user => ctx.user })
}

async fn list(view: Views, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let notes = find_notes(params).await?;

    Ok(view.response("list.html", context! { notes => notes, user => user }))
}

async fn done(view: Views, ctx: Ctx) -> Response {
    view.response("done.html", context! { user => ctx.user })
}

async fn detail(view: Views, Path(slug): Path<String>, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let note = get_note(slug, params).await?;

    Ok(view.response("detail.html", context! { note => note, user => user }))
}

async fn add_view(view: Views, ctx: Ctx) -> Response {
    view.response(
        "note_form.html",
        context! { form => NoteForm::default(), errors => FormErrors::default(), user => ctx.user },
    )
}

async fn add(view: Views, params: BaseParams, Form(form): Form<NoteForm>) -> Result<Response> {
    let user = params.ctx.user.clone();
    let render = |errors: FormErrors| {
        view.response(
            "note_form.html",
            context! { form => &form, errors => errors, user => &user },
        )
    };

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            tracing::debug!(?errors, "note rejected");
            return Ok(render(errors));
        }
    };

    let slug = data.slug.clone();
    if slug_taken(slug.clone(), None, params.db.clone()).await? {
        tracing::debug!(%slug, "slug already taken");
        return Ok(render(FormErrors::single("slug", slug_warning(&slug))));
    }

    match create_note(data, params).await {
        Ok(note) => {
            tracing::info!(note_id = %note.id, slug = %note.slug, "note created");
            Ok(found(DONE_URL))
        }
        // another note took the slug after the check
        Err(Error::DB(db::Error::UniqueViolation(_))) => Ok(render(FormErrors::single("slug", slug_warning(&slug)))),
        Err(error) => Err(error),
    }
}

async fn edit_view(view: Views, Path(slug): Path<String>, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let note = get_note(slug, params).await?;
    let form = NoteForm::from(&note);

    Ok(view.response(
        "note_form.html",
        context! { note => note, form => form, errors => FormErrors::default(), user => user },
    ))
}

async fn edit(
    view: Views,
    Path(current_slug): Path<String>,
    params: BaseParams,
    Form(form): Form<NoteForm>,
) -> Result<Response> {
    let user = params.ctx.user.clone();
    let note = get_note(current_slug.clone(), params.clone()).await?;
    let render = |errors: FormErrors| {
        view.response(
            "note_form.html",
            context! { note => &note, form => &form, errors => errors, user => &user },
        )
    };

    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            tracing::debug!(note_id = %note.id, ?errors, "note edit rejected");
            return Ok(render(errors));
        }
    };

    let slug = data.slug.clone();
    if slug_taken(slug.clone(), Some(note.id), params.db.clone()).await? {
        tracing::debug!(%slug, "slug already taken");
        return Ok(render(FormErrors::single("slug", slug_warning(&slug))));
    }

    match update_note(current_slug, data, params).await {
        Ok(updated) => {
            tracing::info!(note_id = %updated.id, slug = %updated.slug, "note updated");
            Ok(found(DONE_URL))
        }
        Err(Error::DB(db::Error::UniqueViolation(_))) => Ok(render(FormErrors::single("slug", slug_warning(&slug)))),
        Err(error) => Err(error),
    }
}

async fn delete_view(view: Views, Path(slug): Path<String>, params: BaseParams) -> Result<Response> {
    let user = params.ctx.user.clone();
    let note = get_note(slug, params).await?;

    Ok(view.response("delete.html", context! { note => note, user => user }))
}

async fn remove(Path(slug): Path<String>, params: BaseParams) -> Result<Response> {
    let note_id = delete_note(slug, params).await?;
    tracing::info!(%note_id, "note deleted");

    Ok(found(DONE_URL))
}
