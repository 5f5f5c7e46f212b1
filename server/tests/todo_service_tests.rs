use todo_chat_server::todo::{TodoService, TodoServiceError};

mod common;

async fn setup() -> anyhow::Result<common::TodosDb> {
    common::TodosDb::new().await
}

#[tokio::test]
async fn can_create_todo_with_defaults() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);

    let todo = service
        .create_todo("Read Books".to_string(), Some("Read 30 pages daily".to_string()))
        .await
        .expect("Failed to create todo");

    assert_eq!(todo.title(), "Read Books");
    assert_eq!(todo.description(), Some("Read 30 pages daily"));
    assert!(!todo.completed());
}

#[tokio::test]
async fn get_all_todos_returns_newest_first() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);

    for title in ["First", "Second", "Third"] {
        service
            .create_todo(title.to_string(), None)
            .await
            .expect("Failed to create todo");
        // Insert timestamps must differ for the ordering to be observable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let todos = service.get_all_todos().await.expect("Failed to list todos");
    let titles: Vec<&str> = todos.iter().map(|todo| todo.title()).collect();

    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn exact_title_lookup_ignores_case_but_not_substrings() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);
    service
        .create_todo("Read Books".to_string(), None)
        .await
        .expect("Failed to create todo");

    let exact = service
        .find_by_exact_title("read books")
        .await
        .expect("Lookup failed");
    assert!(exact.is_some());

    let partial = service
        .find_by_exact_title("read")
        .await
        .expect("Lookup failed");
    assert!(partial.is_none());
}

#[tokio::test]
async fn fragment_lookup_matches_substrings_case_insensitively() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);
    service
        .create_todo("Morning Gym Session".to_string(), None)
        .await
        .expect("Failed to create todo");

    let matched = service
        .find_by_title_fragment("GYM")
        .await
        .expect("Lookup failed");
    assert_eq!(
        matched.map(|todo| todo.title().to_string()),
        Some("Morning Gym Session".to_string())
    );

    let missed = service
        .find_by_title_fragment("shopping")
        .await
        .expect("Lookup failed");
    assert!(missed.is_none());
}

#[tokio::test]
async fn delete_by_id_returns_the_removed_row() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);
    let created = service
        .create_todo("Short Lived".to_string(), None)
        .await
        .expect("Failed to create todo");

    let deleted = service
        .delete_by_id(created.id())
        .await
        .expect("Failed to delete todo");
    assert_eq!(deleted, created);
    assert_eq!(service.count_todos().await.expect("Count failed"), 0);

    let repeat = service.delete_by_id(created.id()).await;
    assert!(matches!(repeat, Err(TodoServiceError::TodoNotFound(id)) if id == created.id()));
}

#[tokio::test]
async fn count_reflects_inserts() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TodoService::new(&state.db);

    assert_eq!(service.count_todos().await.expect("Count failed"), 0);

    service
        .create_todo("One".to_string(), None)
        .await
        .expect("Failed to create todo");
    service
        .create_todo("Two".to_string(), None)
        .await
        .expect("Failed to create todo");

    assert_eq!(service.count_todos().await.expect("Count failed"), 2);
}
