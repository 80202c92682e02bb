use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[sqlx(rename = "user_id")]
    pub user: Uuid, // owning user, fixed at creation
}

/// Fields for a blog about to be inserted.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub date: OffsetDateTime,
    pub user: Uuid,
}
