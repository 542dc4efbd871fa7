use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::repositories::user_repository::RepositoryError;
use crate::services::{AuthServiceError, UploadError, UserServiceError};

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that escape a handler. Form mistakes never end up here; they are
/// rendered back onto the page instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("User service error: {0}")]
    UserService(#[from] UserServiceError),

    #[error("Auth service error: {0}")]
    AuthService(#[from] AuthServiceError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UserService(UserServiceError::UserNotFound)
            | AppError::AuthService(AuthServiceError::UserNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Forbidden => "Forbidden".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            _ if status == StatusCode::NOT_FOUND => "User not found".to_string(),
            other => {
                tracing::error!(error = %other, "Request failed");
                "Internal server error".to_string()
            }
        };

        (status, message).into_response()
    }
}
