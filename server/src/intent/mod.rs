use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Structured create/delete instruction extracted from a free-text prompt.
///
/// The field names on the wire (`todo_name`, `todo_description`,
/// `delete_todo_name`) are the fixed JSON contract the model is instructed
/// to emit; a populated `delete_title` takes precedence over the create
/// fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoIntent {
    #[serde(rename = "todo_name", default)]
    pub create_title: String,
    #[serde(rename = "todo_description", default)]
    pub create_description: String,
    #[serde(rename = "delete_todo_name", default)]
    pub delete_title: Option<String>,
}

/// Errors that can occur while extracting an intent from a prompt.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// The HTTP call to the model endpoint failed outright.
    #[error("Request to intent model failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The model endpoint answered with a non-success status.
    #[error("Intent model returned status {status}: {message}")]
    Api { status: u16, message: String },
    /// The model answered, but not with the expected JSON shape.
    #[error("Intent model returned an unparseable response: {0}")]
    MalformedResponse(String),
}

/// Maps free-text input to a structured create/delete instruction.
///
/// All natural-language understanding is delegated to implementations of
/// this trait; tests substitute a deterministic stub.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract_intent(&self, prompt: &str) -> Result<TodoIntent, IntentError>;
}

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const INTENT_INSTRUCTIONS: &str = r#"You are a todo assistant. Decide whether the user wants to CREATE or DELETE a todo.

For CREATE: fill todo_name with a short title (1-3 words) and todo_description with what needs to be done; set delete_todo_name to null.
For DELETE: set todo_name and todo_description to empty strings and put the title to delete in delete_todo_name.

Always answer with exactly this JSON object and nothing else:
{"todo_name": "" , "todo_description": "", "delete_todo_name": null}

Examples:
"create a todo for reading books" -> {"todo_name": "Read Books", "todo_description": "Read 30 pages daily", "delete_todo_name": null}
"delete my gym todo" -> {"todo_name": "", "todo_description": "", "delete_todo_name": "gym"}"#;

/// Intent extractor backed by Gemini's OpenAI-compatible chat completions
/// endpoint.
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl GeminiExtractor {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl IntentExtractor for GeminiExtractor {
    #[tracing::instrument(skip(self))]
    async fn extract_intent(&self, prompt: &str) -> Result<TodoIntent, IntentError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: INTENT_INSTRUCTIONS.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(IntentError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|err| IntentError::MalformedResponse(err.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                IntentError::MalformedResponse("response contained no choices".to_string())
            })?;

        parse_intent(&content)
    }
}

/// Parses the model's JSON reply, tolerating surrounding markdown code
/// fences.
pub fn parse_intent(content: &str) -> Result<TodoIntent, IntentError> {
    serde_json::from_str(strip_code_fences(content))
        .map_err(|err| IntentError::MalformedResponse(err.to_string()))
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag after the opening fence.
    let fenced = fenced.strip_prefix("json").unwrap_or(fenced);
    fenced.strip_suffix("```").unwrap_or(fenced).trim()
}
