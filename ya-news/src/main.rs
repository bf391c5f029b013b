mod app;
mod config;
mod migrations;
mod news;

use std::net::SocketAddr;

pub use config::config;
use shared::{
    db::init_db,
    tracing::{add_tracing_layer, setup_tracing},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config();

    setup_tracing(
        config.log_json,
        "ya_news=debug,shared=debug,tower_http=debug,axum::rejection=trace",
    );

    let db = init_db(&config.database_url, &migrations::MIGRATIONS).await?;

    if config.dev_fixtures {
        news::fixtures::seed(db.clone()).await?;
    }

    let app = add_tracing_layer(app::create_app(db).await?);

    let listener = TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

#[cfg(test)]
pub mod tests {
    use axum_test::TestServer;
    use shared::{db::DB, testing::server};

    use crate::{app::create_app, migrations::MIGRATIONS};

    pub async fn init_test_db() -> DB {
        shared::db::init_test_db(&MIGRATIONS).await.unwrap()
    }

    pub async fn test_server(db: DB) -> TestServer {
        server(create_app(db).await.unwrap())
    }
}
