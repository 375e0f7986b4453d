use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned when an object-storage lookup fails for a reason other
/// than the object being absent.
pub const LOOKUP_FAILED_MESSAGE: &str = "An error occurred while checking the file.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage lookup failed: {0:#}")]
    LookupFailed(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LookupFailed(_) | AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures never put their detail on the wire.
        let body = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg,
            AppError::LookupFailed(_) => LOOKUP_FAILED_MESSAGE.to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
            AppError::ConfigError(_) => "Configuration error".to_string(),
        };

        (status, body).into_response()
    }
}
