//! SQLite CategoryRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{is_foreign_key_violation, is_unique_violation};
use crate::db::utils::current_timestamp;
use crate::db::{Category, CategoryRepository, DEFAULT_CATEGORY_COLOR, DbError, DbResult, Id};

const ENTITY: &str = "Category";

/// SQLx-backed category repository.
#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pub(crate) pool: SqlitePool,
}

impl CategoryRepository for SqliteCategoryRepository {
    async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, color, created_at, updated_at
             FROM categories
             ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_category).collect()
    }

    async fn get(&self, id: Id) -> DbResult<Category> {
        let row = sqlx::query(
            "SELECT id, name, color, created_at, updated_at
             FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found(ENTITY, id))?;
        row_to_category(&row)
    }

    async fn create(&self, name: &str, color: &str) -> DbResult<Category> {
        let now = current_timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, color, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(color_or_default(color))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_name_or(e, name))?;

        self.get(result.last_insert_rowid()).await
    }

    async fn update(&self, id: Id, name: &str, color: &str) -> DbResult<Category> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, color = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(color_or_default(color))
        .bind(current_timestamp())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_name_or(e, name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        self.get(id).await
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE category_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Err(DbError::InUse {
                entity_type: ENTITY.to_string(),
                id: id.to_string(),
                count,
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // A todo was filed under the category after the count above.
                if is_foreign_key_violation(&e) {
                    DbError::Constraint {
                        message: format!("{} {} is referenced by a todo", ENTITY, id),
                    }
                } else {
                    DbError::from(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }
}

fn color_or_default(color: &str) -> &str {
    if color.is_empty() {
        DEFAULT_CATEGORY_COLOR
    } else {
        color
    }
}

fn duplicate_name_or(e: sqlx::Error, name: &str) -> DbError {
    if is_unique_violation(&e) {
        DbError::AlreadyExists {
            entity_type: ENTITY.to_string(),
            name: name.to_string(),
        }
    } else {
        DbError::from(e)
    }
}

/// Convert a database row to a Category model.
fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> DbResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        color: row.try_get("color")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
