use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo::RepoError,
    repo_types::{NewUser, User, UserChanges},
    validation::{check_name_and_email, normalize_email},
};
use crate::{
    auth::password::hash_password,
    response::{respond, ApiError, ApiResponse, ApiResult},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.users.get_all().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch users")
    })?;
    respond(
        StatusCode::OK,
        ApiResponse::success("Users retrieved successfully", users),
    )
}

#[instrument(skip(state))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let user = state.users.get_by_id(&id).await?;
    respond(
        StatusCode::OK,
        ApiResponse::success("User retrieved successfully", user),
    )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    check_name_and_email(&payload.name, &email).map_err(ApiError::bad_request)?;
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }

    let password_hash = hash_password(&payload.password).map_err(ApiError::internal)?;
    let user = state
        .users
        .create(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user failed");
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, "user created");
    respond(
        StatusCode::CREATED,
        ApiResponse::success("User created successfully", user),
    )
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(payload) = payload?;
    let changes = UserChanges {
        name: payload.name.trim().to_string(),
        email: normalize_email(&payload.email),
    };
    changes.validate().map_err(ApiError::bad_request)?;

    state.users.update(&id, &changes).await.map_err(|e| {
        if !matches!(e, RepoError::NotFound) {
            warn!(error = %e, user_id = %id, "update user failed");
        }
        ApiError::from(e)
    })?;
    let user = state.users.get_by_id(&id).await?;

    info!(user_id = %user.id, "user updated");
    respond(
        StatusCode::OK,
        ApiResponse::success("User updated successfully", user),
    )
}

#[instrument(skip(state))]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.users.delete(&id).await?;
    info!(user_id = %id, "user deleted");
    respond(StatusCode::OK, ApiResponse::message("User deleted successfully"))
}
