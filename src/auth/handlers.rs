use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, MeResponse, RefreshRequest, SignUpRequest},
    middleware::{require_auth, AuthUser},
    password::{hash_password, verify_password},
};
use crate::{
    response::{respond, ApiError, ApiResponse, ApiResult},
    state::AppState,
    users::{
        repo::RepoError,
        repo_types::NewUser,
        validation::{check_name_and_email, normalize_email},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    check_name_and_email(&payload.name, &email).map_err(|msg| {
        warn!(email = %email, reason = %msg, "signup rejected");
        ApiError::bad_request(msg)
    })?;
    if payload.password.is_empty() {
        warn!(email = %email, "signup without password");
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

    let token = state.jwt.sign_access(&user.id).map_err(ApiError::internal)?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    respond(
        StatusCode::CREATED,
        ApiResponse::success(
            "User created",
            AuthResponse {
                user,
                token,
                refresh_token: None,
            },
        ),
    )
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    let user = match state.users.get_by_email(&email).await {
        Ok(u) => u,
        Err(RepoError::NotFound) => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::unauthorized("User does not exist"));
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&payload.password, &user.password).map_err(ApiError::internal)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.jwt.sign_access(&user.id).map_err(ApiError::internal)?;
    let refresh_token = state.jwt.sign_refresh(&user.id).map_err(ApiError::internal)?;

    info!(user_id = %user.id, "user logged in");
    respond(
        StatusCode::OK,
        ApiResponse::success(
            "Login successful",
            AuthResponse {
                user,
                token,
                refresh_token: Some(refresh_token),
            },
        ),
    )
}

/// Trades a refresh token for a new token pair. Stateless: the old refresh
/// token stays valid until it expires.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(payload) = payload?;

    let claims = state.jwt.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::unauthorized("Invalid or expired refresh token")
    })?;

    let user = match state.users.get_by_id(&claims.sub).await {
        Ok(u) => u,
        Err(RepoError::NotFound) => {
            warn!(user_id = %claims.sub, "refresh for deleted user");
            return Err(ApiError::unauthorized("User does not exist"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.jwt.sign_access(&user.id).map_err(ApiError::internal)?;
    let refresh_token = state.jwt.sign_refresh(&user.id).map_err(ApiError::internal)?;

    respond(
        StatusCode::OK,
        ApiResponse::success(
            "Token refreshed",
            AuthResponse {
                user,
                token,
                refresh_token: Some(refresh_token),
            },
        ),
    )
}

pub async fn me(Extension(AuthUser(user_id)): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse { id: user_id })
}
