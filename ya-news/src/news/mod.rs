pub mod fixtures;
pub mod forms;
pub mod handlers;
mod model;
mod routes;

use minijinja::Environment;

pub use model::*;
pub use routes::router;

pub fn add_templates(env: &mut Environment<'static>) -> Result<(), minijinja::Error> {
    env.add_template("home.html", include_str!("../../templates/home.html"))?;
    env.add_template("detail.html", include_str!("../../templates/detail.html"))?;
    env.add_template("comment_edit.html", include_str!("../../templates/comment_edit.html"))?;
    env.add_template("comment_delete.html", include_str!("../../templates/comment_delete.html"))?;
    Ok(())
}
