pub mod forms;
pub mod handlers;
mod model;
mod routes;
pub mod slug;

use minijinja::Environment;

pub use model::*;
pub use routes::router;

pub fn add_templates(env: &mut Environment<'static>) -> Result<(), minijinja::Error> {
    env.add_template("home.html", include_str!("../../templates/home.html"))?;
    env.add_template("list.html", include_str!("../../templates/list.html"))?;
    env.add_template("detail.html", include_str!("../../templates/detail.html"))?;
    env.add_template("note_form.html", include_str!("../../templates/note_form.html"))?;
    env.add_template("delete.html", include_str!("../../templates/delete.html"))?;
    env.add_template("done.html", include_str!("../../templates/done.html"))?;
    Ok(())
}
