use serde::Serialize;
use shared::users::UserId;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub comment_count: u32,
}

#[derive(Debug, Serialize, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub news_id: Uuid,
    pub author_id: UserId,
    pub author: String,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug)]
pub struct CreateNews {
    pub title: String,
    pub text: String,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug)]
pub struct CreateComment {
    pub text: String,
}

#[derive(Debug)]
pub struct UpdateComment {
    pub text: String,
}
