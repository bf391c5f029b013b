use tower_sessions::session;

use crate::db;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    DB(#[from] db::Error),

    #[error(transparent)]
    Session(#[from] session::Error),

    #[error(transparent)]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
