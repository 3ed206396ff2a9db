use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::schemas::ApiErrorResponse;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Hash(String),
    Session(String),
    NotAuthenticated,
    PermissionDenied(String),
    AuthenticationFailed(String),
    NotFound,
    Validation(Vec<String>),
    TooManyAttempts,
}

impl AppError {
    /// Shorthand for a single-message validation failure.
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::NotAuthenticated => write!(f, "Authentication credentials were not provided."),
            AppError::PermissionDenied(msg) => write!(f, "{msg}"),
            AppError::AuthenticationFailed(msg) => write!(f, "{msg}"),
            AppError::NotFound => write!(f, "Not found."),
            AppError::Validation(_) => write!(f, "Validation failed"),
            AppError::TooManyAttempts => {
                write!(f, "Too many failed login attempts. Please try again later.")
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated | AppError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AppError::Db(_) | AppError::Hash(_) | AppError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => ApiErrorResponse {
                error: self.to_string(),
                details: Some(errors.join("; ")),
            },
            AppError::Db(_) | AppError::Hash(_) | AppError::Session(_) => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                }
            }
            _ => ApiErrorResponse {
                error: self.to_string(),
                details: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

/// Map a unique-constraint violation to a validation error with `msg`,
/// passing every other database error through.
pub fn unique_violation(e: sqlx::Error, msg: &str) -> AppError {
    let is_unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if is_unique {
        AppError::invalid(msg)
    } else {
        AppError::Db(e)
    }
}
