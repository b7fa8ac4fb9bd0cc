//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{self, HealthResponse};
use super::state::AppState;
use super::static_assets;
use super::v1::{
    self, CategoryRequest, CategoryResponse, CreateTodoRequest, ErrorResponse,
    TodoCategoryResponse, TodoResponse, UpdateTodoRequest,
};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Todos with categories, priorities and due dates",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        v1::list_categories,
        v1::get_category,
        v1::create_category,
        v1::update_category,
        v1::delete_category,
        v1::list_todos,
        v1::get_todo,
        v1::create_todo,
        v1::update_todo,
        v1::toggle_todo,
        v1::delete_todo,
    ),
    components(
        schemas(
            HealthResponse,
            CategoryResponse,
            CategoryRequest,
            TodoResponse,
            TodoCategoryResponse,
            CreateTodoRequest,
            UpdateTodoRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health endpoints"),
        (name = "categories", description = "Category management endpoints"),
        (name = "todos", description = "Todo management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation.
///
/// Anything not matched here is served from the embedded static assets.
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new().route("/health", get(handlers::health));

    // Category routes (generic over Database)
    let category_routes = routes!(D => {
        get "/api/categories" => v1::list_categories,
        post "/api/categories" => v1::create_category,
        get "/api/categories/{id}" => v1::get_category,
        put "/api/categories/{id}" => v1::update_category,
        delete "/api/categories/{id}" => v1::delete_category,
    });

    // Todo routes (generic over Database)
    let todo_routes = routes!(D => {
        get "/api/todos" => v1::list_todos,
        post "/api/todos" => v1::create_todo,
        get "/api/todos/{id}" => v1::get_todo,
        put "/api/todos/{id}" => v1::update_todo,
        delete "/api/todos/{id}" => v1::delete_todo,
        put "/api/todos/{id}/toggle" => v1::toggle_todo,
    });

    system_routes
        .merge(category_routes)
        .merge(todo_routes)
        .merge(Scalar::with_url("/docs", api))
        .fallback(static_assets::serve_static)
        .with_state(state)
}
