use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::chat::api::{ChatState, create_chat_router};
use crate::config::Config;
use crate::intent::GeminiExtractor;
use crate::todo::TodoService;
use crate::todo::api::{TodoState, create_todo_router};

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Collapses any datastore/model failure into a generic 500-class response
/// with the underlying message echoed.
pub(crate) fn internal_error(
    err: impl std::fmt::Display,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "INTERNAL_SERVER_ERROR".to_string(),
            message: err.to_string(),
        }),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::chat::api::chat_handler,
        crate::todo::api::get_todos_handler,
        crate::todo::api::create_todo_handler,
        health_check_handler,
    ),
    tags(
        (name = "Chat", description = "Natural-language todo commands"),
        (name = "Todos", description = "Direct todo access"),
        (name = "System", description = "Liveness and diagnostics")
    )
)]
struct ApiDoc;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let db = Arc::new(db);
    let extractor = Arc::new(GeminiExtractor::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));

    let todo_state = TodoState { db: db.clone() };
    let chat_state = ChatState {
        db,
        extractor,
        intent_timeout: Duration::from_secs(config.intent_timeout_secs),
    };

    let app = create_router(todo_state, chat_state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles the full application router from explicitly constructed state.
pub fn create_router(todo_state: TodoState, chat_state: ChatState) -> axum::Router {
    let system_router = axum::Router::new()
        .route("/health", get(health_check_handler))
        .route("/", get(root_handler))
        .route("/debug/db", get(debug_db_handler))
        .with_state(todo_state.clone());

    axum::Router::new()
        .merge(create_todo_router(todo_state))
        .merge(create_chat_router(chat_state))
        .merge(system_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// JSON response for the health endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

/// Handler for GET /health - Probes datastore reachability.
///
/// Always answers 200; a degraded datastore is reported in the body.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Liveness report", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check_handler(
    axum::extract::State(state): axum::extract::State<TodoState>,
) -> Json<HealthResponse> {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match state.db.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            error: None,
            timestamp,
        }),
        Err(err) => {
            tracing::error!("Database ping failed: {}", err);
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                error: Some(err.to_string()),
                timestamp,
            })
        }
    }
}

/// Handler for GET / - Describes the service and its endpoints.
#[tracing::instrument]
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Todo chat backend",
        "endpoints": {
            "POST /chat": "Send natural language commands to create/delete todos",
            "GET /todos": "Get all todos, newest first",
            "POST /todos/create": "Create a todo directly",
            "GET /health": "Check API health",
            "docs": "/docs"
        },
        "intent_model": "Gemini via the OpenAI-compatible chat completions API",
        "database": "PostgreSQL"
    }))
}

#[derive(Debug, Serialize)]
struct ColumnInfo {
    column_name: String,
    data_type: String,
}

#[derive(Debug, Serialize)]
struct DebugDbResponse {
    table_exists: bool,
    row_count: u64,
    schema: Vec<ColumnInfo>,
}

/// Handler for GET /debug/db - Reports row count and column schema of the
/// todos table. Diagnostic only.
#[tracing::instrument(skip(state))]
async fn debug_db_handler(
    axum::extract::State(state): axum::extract::State<TodoState>,
) -> Result<Json<DebugDbResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = TodoService::new(&state.db);
    let row_count = service.count_todos().await.map_err(internal_error)?;

    let rows = state
        .db
        .query_all(Statement::from_string(
            DbBackend::Postgres,
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_name = 'todos' ORDER BY ordinal_position",
        ))
        .await
        .map_err(internal_error)?;

    let mut schema = Vec::with_capacity(rows.len());
    for row in &rows {
        schema.push(ColumnInfo {
            column_name: row.try_get("", "column_name").map_err(internal_error)?,
            data_type: row.try_get("", "data_type").map_err(internal_error)?,
        });
    }

    Ok(Json(DebugDbResponse {
        table_exists: !schema.is_empty(),
        row_count,
        schema,
    }))
}
