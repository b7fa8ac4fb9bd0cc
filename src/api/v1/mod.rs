//! V1 API handlers.

mod categories;
mod todos;


pub use categories::*;
pub use todos::*;

use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::{DbError, ErrorKind, Id};

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Entity not found: Todo with id '42'")]
    pub error: String,
}

/// Error half of every handler's return type.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> HandlerError {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// Map a store error to a response by its kind.
///
/// Storage failures are logged here and reported without detail.
fn db_error(e: DbError) -> HandlerError {
    match e.kind() {
        ErrorKind::Validation => bad_request(e.to_string()),
        ErrorKind::NotFound => error_response(StatusCode::NOT_FOUND, e.to_string()),
        ErrorKind::Conflict => error_response(StatusCode::CONFLICT, e.to_string()),
        ErrorKind::Storage => {
            error!(error = %e, "Database operation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Unwrap a JSON body, reporting any decode failure as 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request(format!("Invalid JSON: {}", rejection.body_text())))
}

/// Unwrap an `{id}` path segment, reporting a non-integer id as 400.
fn path_id(path: Result<Path<Id>, PathRejection>) -> Result<Id, HandlerError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| bad_request(format!("Invalid id: {}", rejection.body_text())))
}
