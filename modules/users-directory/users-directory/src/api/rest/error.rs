//! RFC 9457 problem responses.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use users_directory_sdk::{ErrorKind, UsersDirectoryError};

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Machine-readable error kind.
    pub code: String,
}

#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::Internal | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "User not found",
        ErrorKind::AlreadyExists => "User already exists",
        ErrorKind::InvalidArgument => "Invalid argument",
        ErrorKind::Internal => "Internal server error",
        ErrorKind::Unknown => "Unknown error",
    }
}

/// Error returned by REST handlers; renders as `application/problem+json`.
#[derive(Debug)]
pub struct ApiError {
    error: UsersDirectoryError,
    instance: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn at(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    #[must_use]
    pub fn to_problem(&self) -> Problem {
        let kind = self.error.kind();
        Problem {
            type_url: format!("https://errors.users-directory.dev/{}", kind.as_str()),
            title: title_for(kind).to_owned(),
            status: status_for(kind).as_u16(),
            detail: self.error.to_string(),
            instance: self.instance.clone(),
            code: kind.as_str().to_owned(),
        }
    }
}

impl From<UsersDirectoryError> for ApiError {
    fn from(error: UsersDirectoryError) -> Self {
        Self {
            error,
            instance: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = status_for(self.error.kind());
        (
            status,
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            Json(problem),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
