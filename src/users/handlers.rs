use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{AppError, MessageResponse},
    state::AppState,
    users::{
        dto::{LoginRequest, RegisterRequest, UserEnvelope, UsersEnvelope},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(list_users))
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
        .route("/user/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersEnvelope>, AppError> {
    let users = services::list_users(&state).await?;
    Ok(Json(UsersEnvelope { users }))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let Json(req) = payload?;
    let user = services::register(&state, req).await?;
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(req) = payload?;
    services::authenticate(&state, req).await?;
    Ok(Json(MessageResponse::new("Login Successful")))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete_user(&state, &id).await?;
    Ok(Json(MessageResponse::new("User Deleted")))
}
