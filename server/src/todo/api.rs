use crate::todo::{Todo, TodoService};
use crate::web::{ErrorResponse, internal_error};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct TodoState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a Todo for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoJson {
    /// Unique identifier for the todo
    id: String,
    /// The todo title
    title: String,
    /// Optional free-form description
    description: Option<String>,
    /// Whether the todo has been completed
    completed: bool,
    /// Creation timestamp in RFC 3339 format
    created_at: String,
}

impl From<Todo> for TodoJson {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            title: todo.title().to_string(),
            description: todo.description().map(str::to_string),
            completed: todo.completed(),
            created_at: todo.created_at().to_rfc3339(),
        }
    }
}

/// Query parameters for creating a todo directly.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoParams {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// Handler for GET /todos - Returns all todos, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = Vec<TodoJson>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<Vec<TodoJson>>, (StatusCode, Json<ErrorResponse>)> {
    let service = TodoService::new(&state.db);

    match service.get_all_todos().await {
        Ok(todos) => Ok(Json(todos.into_iter().map(TodoJson::from).collect())),
        Err(err) => {
            tracing::error!("Failed to get todos: {}", err);
            Err(internal_error(err))
        }
    }
}

/// Handler for POST /todos/create - Inserts a todo directly, bypassing the
/// intent model and the duplicate-title check.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/todos/create",
    params(
        ("title" = String, Query, description = "Title of the todo to create"),
        ("description" = Option<String>, Query, description = "Optional description")
    ),
    responses(
        (status = 200, description = "Successfully created todo", body = TodoJson),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<TodoState>,
    Query(params): Query<CreateTodoParams>,
) -> Result<Json<TodoJson>, (StatusCode, Json<ErrorResponse>)> {
    let service = TodoService::new(&state.db);

    match service.create_todo(params.title, params.description).await {
        Ok(todo) => Ok(Json(TodoJson::from(todo))),
        Err(err) => {
            tracing::error!("Failed to create todo: {}", err);
            Err(internal_error(err))
        }
    }
}

/// Creates and returns the todos router.
pub fn create_todo_router(state: TodoState) -> Router {
    Router::new()
        .route("/todos", get(get_todos_handler))
        .route("/todos/create", post(create_todo_handler))
        .with_state(state)
}
