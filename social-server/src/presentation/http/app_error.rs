use crate::domain::error::DomainError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("login required")]
    LoginRequired,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                DomainError::Storage(_) | DomainError::Unexpected(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                ),
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::LoginRequired => (StatusCode::UNAUTHORIZED, "login required".to_string()),
        }
    }

    fn log_if_internal(&self, status: StatusCode) {
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        self.log_if_internal(status);

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}

/// Error for form and page routes: plain-text bodies, and a redirect to the
/// login form when the caller has no session.
#[derive(Debug)]
pub(crate) struct PageError(pub(crate) AppError);

pub(crate) type PageResult<T> = Result<T, PageError>;

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for PageError {
    fn from(err: DomainError) -> Self {
        Self(AppError::Domain(err))
    }
}

impl From<ValidationErrors> for PageError {
    fn from(err: ValidationErrors) -> Self {
        Self(AppError::Validation(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if matches!(self.0, AppError::LoginRequired) {
            return Redirect::to("/login").into_response();
        }

        let (status, msg) = self.0.status_and_message();
        self.0.log_if_internal(status);

        (status, msg).into_response()
    }
}
