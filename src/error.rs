//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every variant maps to one HTTP status class and is rendered as a JSON body of the
//! shape `{"status": "error", "message": ...}`.
//!
//! Server-side failures (`DatabaseError`, `InternalServerError`) are logged with their
//! detail and answered with a generic message, so persistence or hashing internals never
//! reach the client. Authentication failures carry an [`AuthFailure`] so that the
//! individual reasons stay distinguishable inside the process even though they all
//! answer `401`.

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message returned for every unexpected server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Message returned when a transient persistence failure prevents serving the request.
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Why a request was rejected as unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The `Authorization` header is missing or does not use the `Bearer` scheme.
    NoToken,
    /// The bearer token failed signature, format or expiry checks.
    InvalidToken,
    /// The token is valid but the identity it names no longer exists.
    UserNotFound,
    /// Login with an unknown username or a wrong password.
    /// Both cases share this variant so the response never reveals which one it was.
    InvalidCredentials,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::NoToken => "Not authorized, no token",
            AuthFailure::InvalidToken => "Not authorized, invalid token",
            AuthFailure::UserNotFound => "Not authorized, user not found",
            AuthFailure::InvalidCredentials => "Invalid credentials",
        }
    }
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Required request fields were missing or empty (HTTP 400).
    MissingFields(String),
    /// Registration attempted with a username that is already taken (HTTP 400).
    DuplicateUsername,
    /// Any other malformed request (HTTP 400).
    BadRequest(String),
    /// Input failed field-level validation (HTTP 400).
    ValidationError(String),
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(AuthFailure),
    /// The caller is authenticated but does not own the resource (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// The backing store is temporarily unreachable (HTTP 503).
    ServiceUnavailable(String),
    /// A persistence operation failed unexpectedly (HTTP 500).
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::MissingFields(msg) => write!(f, "Missing Fields: {}", msg),
            AppError::DuplicateUsername => write!(f, "Duplicate Username"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(reason) => write!(f, "Unauthorized: {}", reason.message()),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message placed in the response body. Server-side variants never expose their detail.
    pub fn client_message(&self) -> String {
        match self {
            AppError::MissingFields(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::DuplicateUsername => "User already exists".to_string(),
            AppError::Unauthorized(reason) => reason.message().to_string(),
            AppError::ServiceUnavailable(_) => UNAVAILABLE_MESSAGE.to_string(),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers (and from the identity middleware) into the correct HTTP
/// status codes and JSON error responses.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_)
            | AppError::DuplicateUsername
            | AppError::BadRequest(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "status": "error",
            "message": self.client_message()
        }))
    }
}

/// Converts storage failures into `AppError`.
///
/// Uniqueness conflicts surface as a bad request, transient backend outages as
/// `ServiceUnavailable`, everything else as an opaque `DatabaseError`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::BadRequest(msg),
            StoreError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("bcrypt failure: {}", error))
    }
}

/// The blocking pool refused or dropped a job (e.g. during shutdown).
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("blocking task failed: {}", error))
    }
}
