use crate::intent::{IntentError, IntentExtractor, TodoIntent};
use crate::todo::{Todo, TodoService, TodoServiceError};
use std::time::Duration;

pub mod api;

/// Error type for chat prompt handling.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Represents a database error from the underlying todo store.
    #[error(transparent)]
    Todo(#[from] TodoServiceError),
    /// Represents a failure of the intent model other than a timeout.
    #[error(transparent)]
    Intent(#[from] IntentError),
}

/// Outcome of a chat prompt, exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// A new todo was inserted.
    Created(Todo),
    /// An existing todo matched the delete title and was removed.
    Deleted(Todo),
    /// No todo matched the delete title.
    NotFound { title: String },
    /// A todo with the same title already exists; nothing was written.
    AlreadyExists { title: String },
    /// The model produced no usable title (or timed out).
    NoAction,
}

/// What the extracted intent asks us to do, after trimming and precedence.
#[derive(Debug, PartialEq, Eq)]
enum Directive {
    Delete(String),
    Create { title: String, description: String },
    Nothing,
}

/// A populated delete title always wins over the create fields; the source
/// system behaves this way and the behavior is preserved deliberately.
fn directive_from(intent: TodoIntent) -> Directive {
    let delete_title = intent
        .delete_title
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if !delete_title.is_empty() {
        return Directive::Delete(delete_title.to_string());
    }

    let title = intent.create_title.trim();
    if !title.is_empty() {
        // An absent description is stored as an empty string, not NULL.
        return Directive::Create {
            title: title.to_string(),
            description: intent.create_description.trim().to_string(),
        };
    }

    Directive::Nothing
}

/// Orchestrates intent extraction and the todo store for a single prompt.
pub struct ChatService<'a> {
    db: &'a sea_orm::DatabaseConnection,
    extractor: &'a dyn IntentExtractor,
    intent_timeout: Duration,
}

impl<'a> ChatService<'a> {
    pub fn new(
        db: &'a sea_orm::DatabaseConnection,
        extractor: &'a dyn IntentExtractor,
        intent_timeout: Duration,
    ) -> Self {
        Self {
            db,
            extractor,
            intent_timeout,
        }
    }

    /// Classifies a prompt into exactly one `ChatOutcome`.
    ///
    /// The model call is bounded by `intent_timeout`; expiry degrades to
    /// `NoAction` rather than failing the request. Database errors and
    /// non-timeout extractor failures propagate as `ChatError`.
    #[tracing::instrument(skip(self))]
    pub async fn handle_prompt(&self, prompt: &str) -> Result<ChatOutcome, ChatError> {
        let extraction =
            tokio::time::timeout(self.intent_timeout, self.extractor.extract_intent(prompt)).await;
        let intent = match extraction {
            Ok(extracted) => extracted?,
            Err(_) => {
                tracing::warn!(
                    "Intent extraction timed out after {:?}",
                    self.intent_timeout
                );
                return Ok(ChatOutcome::NoAction);
            }
        };

        let todo_service = TodoService::new(self.db);
        match directive_from(intent) {
            Directive::Delete(title) => {
                match todo_service.find_by_title_fragment(&title).await? {
                    Some(matched) => {
                        let deleted = todo_service.delete_by_id(matched.id()).await?;
                        tracing::info!("Deleted todo '{}'", deleted.title());
                        Ok(ChatOutcome::Deleted(deleted))
                    }
                    None => Ok(ChatOutcome::NotFound { title }),
                }
            }
            Directive::Create { title, description } => {
                if todo_service.find_by_exact_title(&title).await?.is_some() {
                    return Ok(ChatOutcome::AlreadyExists { title });
                }
                let created = todo_service.create_todo(title, Some(description)).await?;
                tracing::info!("Created todo '{}'", created.title());
                Ok(ChatOutcome::Created(created))
            }
            Directive::Nothing => Ok(ChatOutcome::NoAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::MockIntentExtractor;
    use async_trait::async_trait;

    fn intent(create: &str, description: &str, delete: Option<&str>) -> TodoIntent {
        TodoIntent {
            create_title: create.to_string(),
            create_description: description.to_string(),
            delete_title: delete.map(str::to_string),
        }
    }

    #[test]
    fn delete_takes_precedence_over_create() {
        let directive = directive_from(intent("Read Books", "Read 30 pages daily", Some("gym")));

        assert_eq!(directive, Directive::Delete("gym".to_string()));
    }

    #[test]
    fn create_directive_trims_title_and_keeps_empty_description() {
        let directive = directive_from(intent("  Read Books  ", "   ", None));

        assert_eq!(
            directive,
            Directive::Create {
                title: "Read Books".to_string(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn whitespace_only_delete_title_is_ignored() {
        let directive = directive_from(intent("Study", "Learn Rust", Some("   ")));

        assert_eq!(
            directive,
            Directive::Create {
                title: "Study".to_string(),
                description: "Learn Rust".to_string(),
            }
        );
    }

    #[test]
    fn empty_intent_yields_nothing() {
        assert_eq!(directive_from(TodoIntent::default()), Directive::Nothing);
    }

    #[tokio::test]
    async fn empty_intent_resolves_to_no_action_without_touching_the_database() {
        let mut extractor = MockIntentExtractor::new();
        extractor
            .expect_extract_intent()
            .returning(|_| Ok(TodoIntent::default()));

        let db = sea_orm::DatabaseConnection::default();
        let service = ChatService::new(&db, &extractor, Duration::from_secs(1));

        let outcome = service.handle_prompt("mumble").await.unwrap();

        assert_eq!(outcome, ChatOutcome::NoAction);
    }

    #[tokio::test]
    async fn extractor_failure_propagates_as_chat_error() {
        let mut extractor = MockIntentExtractor::new();
        extractor.expect_extract_intent().returning(|_| {
            Err(IntentError::MalformedResponse(
                "response contained no choices".to_string(),
            ))
        });

        let db = sea_orm::DatabaseConnection::default();
        let service = ChatService::new(&db, &extractor, Duration::from_secs(1));

        let result = service.handle_prompt("anything").await;

        assert!(matches!(result, Err(ChatError::Intent(_))));
    }

    struct StalledExtractor;

    #[async_trait]
    impl IntentExtractor for StalledExtractor {
        async fn extract_intent(&self, _prompt: &str) -> Result<TodoIntent, IntentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(TodoIntent::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_extraction_degrades_to_no_action() {
        let db = sea_orm::DatabaseConnection::default();
        let service = ChatService::new(&db, &StalledExtractor, Duration::from_millis(100));

        let outcome = service.handle_prompt("create something").await.unwrap();

        assert_eq!(outcome, ChatOutcome::NoAction);
    }
}
