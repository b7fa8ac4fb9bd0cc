//! SQLite implementation of the database traits.
//!
//! This module provides a SQLx-backed implementation of the repository
//! traits defined in the parent module.

mod category;
mod connection;
mod helpers;
mod todo;

#[cfg(test)]
mod todo_test;

pub use category::SqliteCategoryRepository;
pub use connection::SqliteDatabase;
pub use todo::SqliteTodoRepository;
