//! Todo management handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{ErrorResponse, HandlerError, bad_request, db_error, json_body, path_id};
use crate::api::AppState;
use crate::db::{
    CategorySummary, Database, Id, NewTodo, Priority, Todo, TodoRepository, TodoUpdate,
    UrgencyBucket,
};

// =============================================================================
// DTOs
// =============================================================================

/// Category attached to a todo
#[derive(Serialize, ToSchema)]
pub struct TodoCategoryResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Work")]
    pub name: String,
    #[schema(example = "#ff6b6b")]
    pub color: String,
}

impl From<CategorySummary> for TodoCategoryResponse {
    fn from(c: CategorySummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            color: c.color,
        }
    }
}

/// Todo response DTO
#[derive(Serialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 7)]
    pub id: Id,
    #[schema(example = "Renew passport")]
    pub title: String,
    #[schema(example = "Bring two photos")]
    pub description: String,
    #[schema(example = 2)]
    pub category_id: Option<Id>,
    pub category: Option<TodoCategoryResponse>,
    /// 1 (low) to 3 (high)
    #[schema(example = 2)]
    pub priority: i64,
    pub due_date: Option<DateTime<Utc>>,
    /// overdue, upcoming or undated
    #[schema(example = "upcoming")]
    pub urgency: String,
    #[schema(example = false)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoResponse {
    fn at(todo: Todo, now: DateTime<Utc>) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            category_id: todo.category_id,
            category: todo.category.map(TodoCategoryResponse::from),
            priority: todo.priority.as_i64(),
            urgency: UrgencyBucket::of(todo.due_date, now).to_string(),
            due_date: todo.due_date,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self::at(todo, Utc::now())
    }
}

/// Create todo request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(example = "Renew passport")]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Id>,
    /// 1 (low) to 3 (high); defaults to 1
    pub priority: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Update todo request DTO
///
/// Every field except `priority` replaces the stored value, so omitting
/// `category_id` or `due_date` clears it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[schema(example = "Renew passport")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<Id>,
    /// Left unchanged when omitted
    pub priority: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Query parameters for listing todos
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTodosQuery {
    /// Only todos whose title or description contains this text
    pub q: Option<String>,
}

fn required_title(title: &str) -> Result<String, HandlerError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(bad_request("Title is required"));
    }
    Ok(title.to_string())
}

fn checked_priority(priority: Option<i64>) -> Result<Option<i64>, HandlerError> {
    priority
        .map(|p| Priority::try_from(p).map(Priority::as_i64).map_err(bad_request))
        .transpose()
}

// =============================================================================
// Handlers
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Todos in urgency order", body = Vec<TodoResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_todos<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<Vec<TodoResponse>>, HandlerError> {
    let todos = state.db().todos();
    let found = match query.q.as_deref() {
        Some(text) if !text.trim().is_empty() => todos.search(text).await,
        _ => todos.list().await,
    }
    .map_err(db_error)?;

    let now = Utc::now();
    Ok(Json(
        found
            .into_iter()
            .map(|todo| TodoResponse::at(todo, now))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<TodoResponse>, HandlerError> {
    let id = path_id(id)?;
    let todo = state.db().todos().get(id).await.map_err(db_error)?;

    Ok(Json(TodoResponse::from(todo)))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_todo<D: Database>(
    State(state): State<AppState<D>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), HandlerError> {
    let request = json_body(payload)?;
    let title = required_title(&request.title)?;
    let priority = checked_priority(request.priority)?;

    let todos = state.db().todos();
    let created = match (request.description, request.due_date) {
        (None, None) => match (request.category_id, priority) {
            (None, None) => todos.create(&title).await,
            (category_id, None) => todos.create_with_category(&title, category_id).await,
            (category_id, Some(priority)) => {
                todos
                    .create_with_category_and_priority(&title, category_id, priority)
                    .await
            }
        },
        (description, due_date) => {
            todos
                .create_full(NewTodo {
                    description: description.unwrap_or_default(),
                    category_id: request.category_id,
                    priority: priority.unwrap_or_else(|| Priority::default().as_i64()),
                    due_date,
                    ..NewTodo::new(title)
                })
                .await
        }
    }
    .map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Invalid request or id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, HandlerError> {
    let id = path_id(id)?;
    let request = json_body(payload)?;
    let update = TodoUpdate {
        title: required_title(&request.title)?,
        description: request.description,
        category_id: request.category_id,
        priority: checked_priority(request.priority)?,
        due_date: request.due_date,
    };

    let todo = state
        .db()
        .todos()
        .update(id, update)
        .await
        .map_err(db_error)?;

    Ok(Json(TodoResponse::from(todo)))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}/toggle",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Completion flipped", body = TodoResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn toggle_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<TodoResponse>, HandlerError> {
    let id = path_id(id)?;
    let todo = state.db().todos().toggle(id).await.map_err(db_error)?;

    Ok(Json(TodoResponse::from(todo)))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_todo<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = path_id(id)?;

    state.db().todos().delete(id).await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
