use crate::chat::{ChatOutcome, ChatService};
use crate::intent::IntentExtractor;
use crate::todo::api::TodoJson;
use crate::web::{ErrorResponse, internal_error};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct ChatState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub extractor: Arc<dyn IntentExtractor>,
    pub intent_timeout: Duration,
}

/// JSON request payload for the chat endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub prompt: String,
}

/// JSON response for the chat endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// One of: created, deleted, not_found, already_exists, no_action
    action: String,
    /// The todo that was created or deleted, when applicable
    todo: Option<TodoJson>,
    /// Human-readable summary of what happened
    message: Option<String>,
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        match outcome {
            ChatOutcome::Created(todo) => Self {
                action: "created".to_string(),
                message: Some(format!("Todo '{}' created successfully.", todo.title())),
                todo: Some(TodoJson::from(todo)),
            },
            ChatOutcome::Deleted(todo) => Self {
                action: "deleted".to_string(),
                message: Some(format!("Todo '{}' deleted successfully.", todo.title())),
                todo: Some(TodoJson::from(todo)),
            },
            ChatOutcome::NotFound { title } => Self {
                action: "not_found".to_string(),
                todo: None,
                message: Some(format!("Todo '{title}' not found in database.")),
            },
            ChatOutcome::AlreadyExists { title } => Self {
                action: "already_exists".to_string(),
                todo: None,
                message: Some(format!("Todo '{title}' already exists in database.")),
            },
            ChatOutcome::NoAction => Self {
                action: "no_action".to_string(),
                todo: None,
                message: Some("Please specify what todo to create or delete.".to_string()),
            },
        }
    }
}

/// Handler for POST /chat - Maps a natural-language prompt to exactly one
/// create/delete outcome.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Prompt classified into an outcome", body = ChatResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Chat"
)]
pub async fn chat_handler(
    State(state): State<ChatState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let service = ChatService::new(&state.db, state.extractor.as_ref(), state.intent_timeout);

    match service.handle_prompt(&payload.prompt).await {
        Ok(outcome) => Ok(Json(ChatResponse::from(outcome))),
        Err(err) => {
            tracing::error!("Failed to handle chat prompt: {}", err);
            Err(internal_error(err))
        }
    }
}

/// Creates and returns the chat router.
pub fn create_chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state)
}
