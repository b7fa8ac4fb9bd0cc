//! Category management handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::{ErrorResponse, HandlerError, bad_request, db_error, json_body, path_id};
use crate::api::AppState;
use crate::db::{Category, CategoryRepository, DEFAULT_CATEGORY_COLOR, Database, Id};

// =============================================================================
// DTOs
// =============================================================================

/// Category response DTO
#[derive(Serialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Work")]
    pub name: String,
    #[schema(example = "#ff6b6b")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            color: c.color,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Create or replace category request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    /// Category name, unique after trimming
    #[schema(example = "Errands")]
    pub name: String,
    /// Hex color; defaults to #007bff
    #[schema(example = "#4dabf7")]
    pub color: Option<String>,
}

impl CategoryRequest {
    /// Trimmed name and resolved color, or a 400.
    fn validate(self) -> Result<(String, String), HandlerError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(bad_request("Name is required"));
        }

        let color = match self.color.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_CATEGORY_COLOR.to_string(),
            Some(color) if is_hex_color(color) => color.to_string(),
            Some(color) => {
                return Err(bad_request(format!(
                    "Color must be a hex value like #1a2b3c, got '{}'",
                    color
                )));
            }
        };

        Ok((name.to_string(), color))
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories ordered by name", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_categories<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<CategoryResponse>>, HandlerError> {
    let categories = state.db().categories().list().await.map_err(db_error)?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<CategoryResponse>, HandlerError> {
    let id = path_id(id)?;
    let category = state.db().categories().get(id).await.map_err(db_error)?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category<D: Database>(
    State(state): State<AppState<D>>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), HandlerError> {
    let (name, color) = json_body(payload)?.validate()?;

    let category = state
        .db()
        .categories()
        .create(&name, &color)
        .await
        .map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid request or id", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<Json<CategoryResponse>, HandlerError> {
    let id = path_id(id)?;
    let (name, color) = json_body(payload)?.validate()?;

    let category = state
        .db()
        .categories()
        .update(id, &name, &color)
        .await
        .map_err(db_error)?;

    Ok(Json(CategoryResponse::from(category)))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category is in use by todos", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = path_id(id)?;

    state
        .db()
        .categories()
        .delete(id)
        .await
        .map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
