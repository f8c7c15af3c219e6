use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::users::repo::RepoError;

/// Uniform JSON wrapper for every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            error: false,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn respond<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> ApiResult<T> {
    Ok((status, Json(body)))
}

/// Error half of the envelope: `{ message, error: true }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Logs the cause and hides it from the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            message: self.message,
            error: true,
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found("User not found"),
            RepoError::Validation(msg) => Self::bad_request(msg),
            e @ RepoError::EmailTaken(_) => Self::bad_request(e.to_string()),
            RepoError::Database(e) => Self::internal(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request("Invalid request payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success("ok", vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"message": "ok", "error": false, "data": [1, 2]}));
    }

    #[test]
    fn data_is_omitted_when_absent() {
        let json = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "done", "error": false}));
    }

    #[test]
    fn repo_errors_map_to_statuses() {
        assert_eq!(ApiError::from(RepoError::NotFound).status, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(RepoError::Validation("name is required".into())).status,
            StatusCode::BAD_REQUEST
        );
        let conflict = ApiError::from(RepoError::EmailTaken("a@b.io".into()));
        assert_eq!(conflict.status, StatusCode::BAD_REQUEST);
        assert!(conflict.message.contains("a@b.io"));
        let db = ApiError::from(RepoError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.message, "Internal server error");
    }
}
