//! Uniform error body for transport layers.
//!
//! # Responsibility
//! - Translate `BookServiceError` into the `{timestamp, status, error,
//!   message|messages, path}` shape callers put on the wire.
//! - Log unexpected failures; their cause never reaches the body.
//!
//! `ErrorBody::at` is pure. Only `from_service_error` logs.
//!
//! # Invariants
//! - Validation failures carry `messages` (one per violated rule) and no
//!   `message`.
//! - Not-found and unexpected failures carry `message` and no `messages`.

use crate::repo::book_repo::RepoError;
    use crate::service::book_service::BookServiceError;
use chrono::{DateTime, Utc};
use log::error;
use serde::Serialize;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Serializable failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
    pub path: String,
}

impl ErrorBody {
    /// Builds the body for `err` stamped with the current time and logs
    /// unexpected causes.
    pub fn from_service_error(err: &BookServiceError, path: impl Into<String>) -> Self {
        let path = path.into();
        if let Some(line) = failure_log_line(err, &path) {
            error!("{line}");
        }
        Self::at(err, path, Utc::now())
    }

    /// Builds the body for `err` with an explicit timestamp.
    pub fn at(err: &BookServiceError, path: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let path = path.into();
        match err {
            BookServiceError::Validation(_) => {
                Self::validation_at(err.messages(), path, timestamp)
            }
            BookServiceError::NotFound(_) => Self {
                timestamp,
                status: STATUS_NOT_FOUND,
                error: "Not Found",
                message: Some(err.to_string()),
                messages: None,
                path,
            },
            BookServiceError::Unexpected(_) => Self {
                timestamp,
                status: STATUS_INTERNAL_SERVER_ERROR,
                error: "Internal Server Error",
                message: Some(GENERIC_FAILURE_MESSAGE.to_string()),
                messages: None,
                path,
            },
        }
    }

    /// Builds a validation body from already rendered `field: message` lines.
    ///
    /// Used by transports for payloads that fail before reaching the service,
    /// e.g. undecodable JSON.
    pub fn validation(messages: Vec<String>, path: impl Into<String>) -> Self {
        Self::validation_at(messages, path.into(), Utc::now())
    }

    fn validation_at(messages: Vec<String>, path: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            status: STATUS_BAD_REQUEST,
            error: "Validation Error",
            message: None,
            messages: Some(messages),
            path,
        }
    }
}

/// Metadata-only log event for failures whose cause is hidden from callers.
///
/// `None` for validation and not-found failures.
pub fn failure_log_line(err: &BookServiceError, path: &str) -> Option<String> {
    let BookServiceError::Unexpected(cause) = err else {
        return None;
    };
    let error_code = match cause {
        RepoError::Db(db_err) if db_err.is_constraint_violation() => "constraint_violation",
        _ => "unexpected",
    };
    Some(format!(
        "event=request_failed module=error_body status=error error_code={error_code} path={path} error={cause}"
    ))
}
