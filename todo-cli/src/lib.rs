use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when mutating the task collection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Title cannot be empty.")]
    EmptyTitle,
}

/// A single task in the to-do list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: u32,
    title: String,
    description: String,
    completed: bool,
}

impl Task {
    /// Returns the ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the task has been completed.
    pub fn completed(&self) -> bool {
        self.completed
    }
}

/// Manages the collection of tasks in memory.
///
/// Tasks are keyed by an auto-incrementing ID starting at 1. IDs are never
/// reused, even after a task is deleted.
#[derive(Debug, Clone)]
pub struct TaskManager {
    tasks: HashMap<u32, Task>,
    next_id: u32,
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            next_id: 1,
        }
    }

    /// Adds a new task, rejecting blank or whitespace-only titles.
    ///
    /// # Returns
    ///
    /// The newly created `Task`, or `TaskError::EmptyTitle`.
    pub fn add(&mut self, title: &str, description: &str) -> Result<Task, TaskError> {
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let task = Task {
            id: self.next_id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        };
        self.tasks.insert(self.next_id, task.clone());
        self.next_id += 1;
        Ok(task)
    }

    /// Returns all tasks in insertion order.
    ///
    /// IDs are sequential and never reused, so ascending ID order is the
    /// same as insertion order.
    pub fn list(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by_key(|task| task.id);
        tasks
    }

    /// Retrieves a single task by its ID.
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Updates a task's title and/or description.
    ///
    /// A supplied title is re-validated; `None` fields keep their current
    /// value.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no task with `id` exists, `Ok(Some(task))` with the
    /// updated task otherwise.
    pub fn update(
        &mut self,
        id: u32,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Task>, TaskError> {
        if let Some(new_title) = title {
            if new_title.trim().is_empty() {
                return Err(TaskError::EmptyTitle);
            }
        }
        let Some(task) = self.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(new_title) = title {
            task.title = new_title.to_string();
        }
        if let Some(new_description) = description {
            task.description = new_description.to_string();
        }
        Ok(Some(task.clone()))
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// `true` if a task was removed, `false` if no task with `id` exists.
    pub fn delete(&mut self, id: u32) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Toggles the completion status of a task.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if no task with `id` exists.
    pub fn toggle(&mut self, id: u32) -> Option<Task> {
        let task = self.tasks.get_mut(&id)?;
        task.completed = !task.completed;
        Some(task.clone())
    }
}
