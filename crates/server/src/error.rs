use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;
use tracing::error;

use crate::models::envelope::ResponseStatus;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0}")]
    Conflict(Conflict),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("malformed request: {message}")]
    Malformed { status: StatusCode, message: String },
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RequestError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Entity {
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "resource")]
    Resource,
    #[strum(serialize = "tag")]
    Tag,
    #[strum(serialize = "to-study list entry")]
    ToStudyEntry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("a resource with this url already exists")]
    DuplicateUrl,
    #[error("resource is already in the to-study list")]
    DuplicateStudyEntry,
    #[error("user already left feedback on this resource")]
    DuplicateFeedback,
    #[error("a tag with this name already exists")]
    DuplicateTagName,
}

impl Conflict {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::DuplicateUrl | Self::DuplicateStudyEntry => StatusCode::METHOD_NOT_ALLOWED,
            Self::DuplicateFeedback => StatusCode::FORBIDDEN,
            Self::DuplicateTagName => StatusCode::CONFLICT,
        }
    }
}

#[derive(Clone, Debug, Error)]
pub enum ValidationError {
    #[error("input value is invalid: `{value}`, reason: {reason}")]
    InvalidInput { value: String, reason: String },
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(conflict) => conflict.status(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Malformed { status, .. } => *status,
            Self::Sqlx(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct ErrorResponse<'a> {
    status: ResponseStatus,
    error: &'a str,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            Self::Sqlx(sqlx::Error::RowNotFound) => "not found".to_string(),
            Self::Sqlx(e) => {
                error!("received internal error for user request: {e}");
                "Something went wrong".to_string()
            }
            e => e.to_string(),
        };
        let body = ErrorResponse {
            status: ResponseStatus::Failure,
            error: &error,
        };
        (status, axum::Json(body)).into_response()
    }
}
