use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    blogs::{
        dto::{CreateBlogRequest, UpdateBlogRequest, UserWithBlogs},
        repo_types::{Blog, NewBlog},
    },
    error::AppError,
    state::AppState,
};

fn blog_not_found() -> AppError {
    AppError::NotFound("Blog not found".into())
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// An empty store is reported as not found rather than an empty list.
#[instrument(skip(state))]
pub async fn list_blogs(state: &AppState) -> Result<Vec<Blog>, AppError> {
    let blogs = state.blogs.list().await?;
    if blogs.is_empty() {
        return Err(AppError::NotFound("No blogs found".into()));
    }
    Ok(blogs)
}

#[instrument(skip(state, req))]
pub async fn create_blog(state: &AppState, req: CreateBlogRequest) -> Result<Blog, AppError> {
    let unauthorized = || AppError::Authorization("Unauthorized".into());

    let owner_id = req.user.as_deref().and_then(parse_id).ok_or_else(unauthorized)?;
    if state.users.find_by_id(owner_id).await?.is_none() {
        warn!(%owner_id, "create blog for unknown user");
        return Err(unauthorized());
    }

    let new = NewBlog {
        title: req.title,
        description: req.description,
        image: req.image,
        date: OffsetDateTime::now_utc(),
        user: owner_id,
    };
    let Some(blog) = state.blogs.create_linked(new).await? else {
        warn!(%owner_id, "owner removed while creating blog");
        return Err(unauthorized());
    };

    info!(blog_id = %blog.id, %owner_id, "blog created");
    Ok(blog)
}

#[instrument(skip(state))]
pub async fn get_blog(state: &AppState, id: &str) -> Result<Blog, AppError> {
    let id = parse_id(id).ok_or_else(blog_not_found)?;
    state.blogs.find_by_id(id).await?.ok_or_else(blog_not_found)
}

#[instrument(skip(state, req))]
pub async fn update_blog(
    state: &AppState,
    id: &str,
    req: UpdateBlogRequest,
) -> Result<Blog, AppError> {
    let id = parse_id(id).ok_or_else(blog_not_found)?;
    let blog = state
        .blogs
        .update(id, req.title.as_deref(), req.description.as_deref())
        .await?
        .ok_or_else(blog_not_found)?;
    info!(blog_id = %blog.id, "blog updated");
    Ok(blog)
}

#[instrument(skip(state))]
pub async fn delete_blog(state: &AppState, id: &str) -> Result<(), AppError> {
    let id = parse_id(id).ok_or_else(blog_not_found)?;
    let blog = state.blogs.delete_linked(id).await?.ok_or_else(blog_not_found)?;
    info!(blog_id = %blog.id, owner_id = %blog.user, "blog deleted");
    Ok(())
}

#[instrument(skip(state))]
pub async fn blogs_by_user(state: &AppState, user_id: &str) -> Result<UserWithBlogs, AppError> {
    let not_found = || AppError::NotFound("No Blog Found".into());
    let user_id = parse_id(user_id).ok_or_else(not_found)?;
    let user = state.users.find_by_id(user_id).await?.ok_or_else(not_found)?;
    let blogs = state.blogs.list_by_ids(&user.blogs).await?;
    Ok(UserWithBlogs::new(user, blogs))
}
