use axum::Router;
use minijinja::Environment;
use shared::{
    app::{create, AppParams},
    db::DB,
    state::Site,
    Result,
};

use crate::{config, news};

pub const SITE: Site = Site {
    name: "YaNews",
    home_url: "/",
};

fn add_templates(env: &mut Environment<'static>) -> std::result::Result<(), minijinja::Error> {
    env.add_template("base.html", include_str!("../templates/base.html"))?;
    news::add_templates(env)
}

pub async fn create_app(db: DB) -> Result<Router> {
    create(AppParams {
        db,
        site: SITE,
        session_days: config().session_days,
        templates: add_templates,
        router: news::router,
    })
    .await
}
