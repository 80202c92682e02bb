use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    blogs::{
        dto::{
            BlogEnvelope, BlogsEnvelope, CreateBlogRequest, UpdateBlogRequest,
            UserWithBlogsEnvelope,
        },
        services,
    },
    error::{AppError, MessageResponse},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(list_blogs))
        .route("/blog/:id", get(get_blog))
        .route("/blog/user/:id", get(blogs_by_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blog/add", post(create_blog))
        .route("/blog/update/:id", put(update_blog))
        .route("/blog/:id", delete(delete_blog))
}

#[instrument(skip(state))]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<BlogsEnvelope>, AppError> {
    let blogs = services::list_blogs(&state).await?;
    Ok(Json(BlogsEnvelope { blogs }))
}

#[instrument(skip(state, payload))]
pub async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<Json<BlogEnvelope>, AppError> {
    let Json(req) = payload?;
    let blog = services::create_blog(&state, req).await?;
    Ok(Json(BlogEnvelope { blog }))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogEnvelope>, AppError> {
    let blog = services::get_blog(&state, &id).await?;
    Ok(Json(BlogEnvelope { blog }))
}

#[instrument(skip(state, payload))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> Result<Json<BlogEnvelope>, AppError> {
    let Json(req) = payload?;
    let blog = services::update_blog(&state, &id, req).await?;
    Ok(Json(BlogEnvelope { blog }))
}

#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete_blog(&state, &id).await?;
    Ok(Json(MessageResponse::new("Blog Deleted")))
}

#[instrument(skip(state))]
pub async fn blogs_by_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserWithBlogsEnvelope>, AppError> {
    let user = services::blogs_by_user(&state, &id).await?;
    Ok(Json(UserWithBlogsEnvelope { user }))
}
