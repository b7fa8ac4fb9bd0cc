//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! with SQLite as the storage backend.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types and their classification
//! - `models`: Domain entities (Category, Todo)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx-backed implementation of the repositories

mod error;
mod models;
mod repository;
mod sqlite;
pub mod utils;


pub use error::{DbError, DbResult, ErrorKind};
pub use models::*;
pub use repository::*;
pub use sqlite::{SqliteCategoryRepository, SqliteDatabase, SqliteTodoRepository};
