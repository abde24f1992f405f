use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Tournament is full")]
    TournamentFull,

    #[error("Registration for this tournament is closed")]
    RegistrationClosed,

    #[error("You are not registered for this tournament")]
    NotRegistered,

    #[error("You registered too recently to withdraw, please wait {minutes} {}", minute_unit(.minutes))]
    CooldownActive { minutes: i64 },

    #[error("{0}")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalServerError(String),
}

fn minute_unit(minutes: &i64) -> &'static str {
    if *minutes == 1 {
        "minute"
    } else {
        "minutes"
    }
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Message shown to clients. Internal failures never leak detail.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::DatabaseError(_) | ApiError::InternalServerError(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(format!("Validation error: {}", errors))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_)
            | ApiError::TournamentFull
            | ApiError::RegistrationClosed
            | ApiError::NotRegistered
            | ApiError::CooldownActive { .. }
            | ApiError::DuplicateName(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) | ApiError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed with an internal error");
        }

        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            error: self.public_message(),
        })
    }
}
