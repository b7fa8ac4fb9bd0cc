//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! handlers generic over [`Database`] can be spawned onto the runtime.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Category, Id, NewTodo, Todo, TodoUpdate},
};

/// Repository for Category operations.
pub trait CategoryRepository: Send + Sync {
    /// Get all categories, ordered by name.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Category>>> + Send;

    /// Get a category by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Category>> + Send;

    /// Create a category. An empty color falls back to the default.
    fn create(&self, name: &str, color: &str) -> impl Future<Output = DbResult<Category>> + Send;

    /// Overwrite a category's name and color.
    fn update(
        &self,
        id: Id,
        name: &str,
        color: &str,
    ) -> impl Future<Output = DbResult<Category>> + Send;

    /// Delete a category that no todo references.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Todo operations.
///
/// Only [`create_full`](TodoRepository::create_full) must be implemented for
/// creation; the narrower constructors fill in defaults and delegate to it.
pub trait TodoRepository: Send + Sync {
    /// Get all todos in urgency order.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Get todos whose title or description contains `text`, in urgency order.
    fn search(&self, text: &str) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Get a todo by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Create a todo from every field. Out-of-range priorities become low.
    fn create_full(&self, todo: NewTodo) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Create a todo with just a title.
    fn create(&self, title: &str) -> impl Future<Output = DbResult<Todo>> + Send {
        self.create_full(NewTodo::new(title))
    }

    /// Create a todo filed under a category.
    fn create_with_category(
        &self,
        title: &str,
        category_id: Option<Id>,
    ) -> impl Future<Output = DbResult<Todo>> + Send {
        self.create_full(NewTodo {
            category_id,
            ..NewTodo::new(title)
        })
    }

    /// Create a todo with a category and priority.
    fn create_with_category_and_priority(
        &self,
        title: &str,
        category_id: Option<Id>,
        priority: i64,
    ) -> impl Future<Output = DbResult<Todo>> + Send {
        self.create_full(NewTodo {
            category_id,
            priority,
            ..NewTodo::new(title)
        })
    }

    /// Flip a todo's completion state.
    fn toggle(&self, id: Id) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Apply an update; see [`TodoUpdate`] for which fields overwrite.
    fn update(&self, id: Id, update: TodoUpdate) -> impl Future<Output = DbResult<Todo>> + Send;

    /// Delete a todo by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;
}

/// Combined database interface.
///
/// Repositories are cheap handles over a shared connection pool, so they are
/// returned by value.
pub trait Database: Send + Sync {
    type Categories: CategoryRepository;
    type Todos: TodoRepository;

    /// Bring the schema up to date. Safe to run on every start.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the category repository.
    fn categories(&self) -> Self::Categories;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos;
}
