//! SQLite TodoRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{contains_pattern, is_foreign_key_violation};
use crate::db::utils::{current_timestamp, to_db_timestamp};
use crate::db::{
    CategorySummary, DbError, DbResult, Id, NewTodo, Priority, Todo, TodoRepository, TodoUpdate,
};

const ENTITY: &str = "Todo";

/// Todo columns plus the joined category projection.
const SELECT_TODOS: &str = r#"
    SELECT
        t.id, t.title, COALESCE(t.description, '') AS description, t.category_id,
        COALESCE(t.priority, 1) AS priority, t.due_date, t.completed,
        t.created_at, t.updated_at,
        c.id AS category_ref_id, c.name AS category_name, c.color AS category_color
    FROM todos t
    LEFT JOIN categories c ON t.category_id = c.id
"#;

/// Listing order: open before done, then overdue / upcoming / undated,
/// then earliest due, highest priority, newest.
///
/// Binds one parameter: the current time in storage format.
const URGENCY_ORDER: &str = r#"
    ORDER BY
        t.completed ASC,
        CASE
            WHEN t.due_date IS NULL THEN 2
            WHEN t.due_date < ? THEN 0
            ELSE 1
        END ASC,
        t.due_date ASC,
        t.priority DESC,
        t.created_at DESC
"#;

/// SQLx-backed todo repository.
#[derive(Clone)]
pub struct SqliteTodoRepository {
    pub(crate) pool: SqlitePool,
}

impl TodoRepository for SqliteTodoRepository {
    async fn list(&self) -> DbResult<Vec<Todo>> {
        let sql = format!("{} {}", SELECT_TODOS, URGENCY_ORDER);

        let rows = sqlx::query(&sql)
            .bind(current_timestamp())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn search(&self, text: &str) -> DbResult<Vec<Todo>> {
        let sql = format!(
            r"{} WHERE t.title LIKE ? ESCAPE '\' OR t.description LIKE ? ESCAPE '\' {}",
            SELECT_TODOS, URGENCY_ORDER
        );
        let pattern = contains_pattern(text);

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(current_timestamp())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn get(&self, id: Id) -> DbResult<Todo> {
        let sql = format!("{} WHERE t.id = ?", SELECT_TODOS);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found(ENTITY, id))?;
        row_to_todo(&row)
    }

    async fn create_full(&self, todo: NewTodo) -> DbResult<Todo> {
        let now = current_timestamp();
        let priority = Priority::clamped(todo.priority);

        let result = sqlx::query(
            r#"
            INSERT INTO todos (title, description, category_id, priority, due_date, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.category_id)
        .bind(priority.as_i64())
        .bind(todo.due_date.as_ref().map(to_db_timestamp))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_category_or(e, todo.category_id))?;

        self.get(result.last_insert_rowid()).await
    }

    async fn toggle(&self, id: Id) -> DbResult<Todo> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET completed = NOT completed, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(current_timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        self.get(id).await
    }

    async fn update(&self, id: Id, update: TodoUpdate) -> DbResult<Todo> {
        let priority = update.priority.map(|p| Priority::clamped(p).as_i64());

        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = ?, description = ?, category_id = ?,
                priority = COALESCE(?, priority), due_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.category_id)
        .bind(priority)
        .bind(update.due_date.as_ref().map(to_db_timestamp))
        .bind(current_timestamp())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_category_or(e, update.category_id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

fn missing_category_or(e: sqlx::Error, category_id: Option<Id>) -> DbError {
    match category_id {
        Some(category_id) if is_foreign_key_violation(&e) => DbError::Validation {
            message: format!("category {} does not exist", category_id),
        },
        _ => DbError::from(e),
    }
}

/// Convert a joined database row to a Todo model.
fn row_to_todo(row: &sqlx::sqlite::SqliteRow) -> DbResult<Todo> {
    let category_ref_id: Option<Id> = row.try_get("category_ref_id")?;
    let category_name: Option<String> = row.try_get("category_name")?;
    let category_color: Option<String> = row.try_get("category_color")?;

    let category = match (category_ref_id, category_name, category_color) {
        (Some(id), Some(name), Some(color)) => Some(CategorySummary { id, name, color }),
        _ => None,
    };

    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category_id: row.try_get("category_id")?,
        category,
        priority: Priority::clamped(row.try_get("priority")?),
        due_date: row.try_get("due_date")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
