use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{blogs::repo_types::Blog, users::repo_types::User};

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Owner id as sent by the client; resolved against the user store.
    pub user: Option<String>,
}

/// Only title and description are updatable; omitted fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogEnvelope {
    pub blog: Blog,
}

#[derive(Debug, Serialize)]
pub struct BlogsEnvelope {
    pub blogs: Vec<Blog>,
}

/// A user with its back-referenced blogs expanded.
#[derive(Debug, Serialize)]
pub struct UserWithBlogs {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub blogs: Vec<Blog>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl UserWithBlogs {
    pub fn new(user: User, blogs: Vec<Blog>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            blogs,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserWithBlogsEnvelope {
    pub user: UserWithBlogs,
}
