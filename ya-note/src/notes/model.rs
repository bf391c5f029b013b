use serde::Serialize;
use shared::users::UserId;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A validated note form with its slug already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteData {
    pub title: String,
    pub text: String,
    pub slug: String,
}
