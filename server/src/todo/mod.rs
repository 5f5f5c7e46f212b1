use crate::entities::*;
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

pub mod api;

/// A persisted to-do item.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Todo {
    id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTimeWithTimeZone,
}

impl Todo {
    /// Returns the ID of the todo.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the title of the todo.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the todo.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the todo has been completed.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp of the todo.
    pub fn created_at(&self) -> DateTimeWithTimeZone {
        self.created_at
    }
}

impl From<todos::Model> for Todo {
    fn from(model: todos::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at,
        }
    }
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Represents a todo not found error.
    #[error("Todo with ID {0} not found")]
    TodoNotFound(Uuid),
}

pub struct TodoService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TodoService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TodoService {
        TodoService { db }
    }

    /// Creates a new todo in the database.
    ///
    /// The duplicate-title pre-check is the caller's concern; this insert is
    /// unconditional.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(
        &self,
        title: String,
        description: Option<String>,
    ) -> Result<Todo, TodoServiceError> {
        let active_model = todos::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            completed: ActiveValue::Set(false),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Todo::from(created_model))
    }

    /// Looks up a todo whose title matches exactly, ignoring case.
    ///
    /// # Returns
    ///
    /// A `Result` containing the matching `Todo` if one exists, or `None` otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_exact_title(
        &self,
        title: &str,
    ) -> Result<Option<Todo>, TodoServiceError> {
        let todo = todos::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(todos::Column::Title))).eq(title.to_lowercase()),
            )
            .one(self.db)
            .await?;
        Ok(todo.map(Todo::from))
    }

    /// Looks up the first todo whose title contains `fragment`, ignoring case.
    ///
    /// The first match under the database's default ordering is returned;
    /// no explicit ordering is imposed.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_title_fragment(
        &self,
        fragment: &str,
    ) -> Result<Option<Todo>, TodoServiceError> {
        let todo = todos::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(todos::Column::Title)))
                    .like(format!("%{}%", fragment.to_lowercase())),
            )
            .one(self.db)
            .await?;
        Ok(todo.map(Todo::from))
    }

    /// Deletes a todo by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: Uuid) -> Result<Todo, TodoServiceError> {
        let todo_to_delete = todos::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TodoServiceError::TodoNotFound(id))?;

        let todo_copy = Todo::from(todo_to_delete);
        todos::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(todo_copy)
    }

    /// Retrieves all todos from the database, newest first.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_todos(&self) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = todos::Entity::find()
            .order_by_desc(todos::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Todo::from)
            .collect();
        Ok(todos)
    }

    /// Counts the todos currently in the database.
    #[tracing::instrument(skip(self))]
    pub async fn count_todos(&self) -> Result<u64, TodoServiceError> {
        let count = todos::Entity::find().count(self.db).await?;
        Ok(count)
    }
}
