//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! Every variant belongs to exactly one [`ErrorKind`], which is what callers
//! branch on when deciding how to report a failure.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(todo_server::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Entity already exists: {entity_type} named '{name}'")]
    #[diagnostic(code(todo_server::db::already_exists))]
    AlreadyExists { entity_type: String, name: String },

    #[error("{entity_type} is in use by {count} todos")]
    #[diagnostic(
        code(todo_server::db::in_use),
        help("Reassign or delete the referencing todos first")
    )]
    InUse {
        entity_type: String,
        id: String,
        count: i64,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(todo_server::db::validation_error))]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(todo_server::db::constraint))]
    Constraint { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(todo_server::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(todo_server::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(todo_server::db::connection_error))]
    Connection { message: String },
}

/// Classification of a [`DbError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input that can never be stored as given.
    Validation,
    /// The addressed row does not exist.
    NotFound,
    /// A uniqueness or reference rule blocks the write.
    Conflict,
    /// The engine itself failed.
    Storage,
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::Validation { .. } => ErrorKind::Validation,
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::AlreadyExists { .. } | DbError::InUse { .. } | DbError::Constraint { .. } => {
                ErrorKind::Conflict
            }
            DbError::Database { .. } | DbError::Migration { .. } | DbError::Connection { .. } => {
                ErrorKind::Storage
            }
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: i64) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::Database {
            message: e.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
