//! The todo store: list, create, update and delete over a whole-collection
//! backend.
//!
//! # Design
//! Every mutation is load → change in memory → save. The three steps run
//! under one async mutex so two concurrent writers cannot interleave and
//! lose each other's change. `list` does not take the lock; it only ever
//! observes a fully saved collection.
//!
//! `list` degrades to an empty collection when the backend cannot be read.
//! Mutations do not: saving on top of a failed load would overwrite the
//! document with a truncated collection.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::ids::IdGenerator;
use crate::storage::TodoStorage;
use crate::types::{CreateTodo, Todo, TodoList, UpdateTodo};
use crate::validation::{validate, Candidate};

pub struct TodoStore {
    storage: Arc<dyn TodoStorage>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
    write_lock: Mutex<()>,
}

impl TodoStore {
    pub fn new(storage: Arc<dyn TodoStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<dyn TodoStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            ids: IdGenerator,
            write_lock: Mutex::new(()),
        }
    }

    /// All records in insertion order. Never fails; an unreadable backend
    /// yields an empty list.
    pub async fn list(&self) -> TodoList {
        match self.storage.load().await {
            Ok(todos) => TodoList::from(todos),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load todos, returning empty list");
                TodoList::from(Vec::new())
            }
        }
    }

    pub async fn create(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let fields = validate(Candidate {
            title: input.title.as_ref(),
            description: input.description.as_ref(),
            completed: input.completed.as_ref(),
        })
        .map_err(StoreError::Validation)?;

        let _guard = self.write_lock.lock().await;
        let mut todos = self.storage.load().await?;

        let now = self.clock.now();
        let todo = Todo {
            id: self.ids.next(&todos),
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
            created_at: now,
            updated_at: now,
        };
        todos.push(todo.clone());
        self.storage.save(&todos).await?;

        tracing::info!(id = %todo.id, "todo created");
        Ok(todo)
    }

    pub async fn update(&self, id: &str, input: UpdateTodo) -> Result<Todo, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut todos = self.storage.load().await?;

        let index = position(&todos, id)?;
        let current = &todos[index];

        // Overlay the supplied keys on the stored record, then validate the
        // result as a whole.
        let stored_title = Value::String(current.title.clone());
        let stored_description = Value::String(current.description.clone());
        let stored_completed = Value::Bool(current.completed);
        let fields = validate(Candidate {
            title: Some(input.title.as_ref().unwrap_or(&stored_title)),
            description: Some(input.description.as_ref().unwrap_or(&stored_description)),
            completed: Some(input.completed.as_ref().unwrap_or(&stored_completed)),
        })
        .map_err(StoreError::Validation)?;

        let todo = &mut todos[index];
        todo.title = fields.title;
        todo.description = fields.description;
        todo.completed = fields.completed;
        todo.updated_at = self.clock.now().max(todo.created_at);
        let updated = todo.clone();

        self.storage.save(&todos).await?;

        tracing::info!(id = %updated.id, "todo updated");
        Ok(updated)
    }

    /// Remove a record and return it as it was before removal.
    pub async fn delete(&self, id: &str) -> Result<Todo, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut todos = self.storage.load().await?;

        let index = position(&todos, id)?;
        let removed = todos.remove(index);
        self.storage.save(&todos).await?;

        tracing::info!(id = %removed.id, "todo deleted");
        Ok(removed)
    }
}

fn position(todos: &[Todo], id: &str) -> Result<usize, StoreError> {
    todos
        .iter()
        .position(|todo| todo.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use crate::validation::{COMPLETED_NOT_BOOLEAN, TITLE_REQUIRED};

    /// Starts at a fixed instant and advances one second per call.
    struct SteppingClock(StdMutex<DateTime<Utc>>);

    impl SteppingClock {
        fn new() -> Self {
            Self(StdMutex::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ))
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.0.lock().unwrap();
            let current = *now;
            *now = current + TimeDelta::seconds(1);
            current
        }
    }

    /// A backend whose reads always fail.
    struct BrokenStorage;

    #[async_trait]
    impl TodoStorage for BrokenStorage {
        async fn init(&self) -> Result<(), StorageError> {
            Ok(())
        }

        async fn load(&self) -> Result<Vec<Todo>, StorageError> {
            Err(StorageError::io(
                "broken.json",
                std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
            ))
        }

        async fn save(&self, _todos: &[Todo]) -> Result<(), StorageError> {
            panic!("save must not be called after a failed load");
        }
    }

    /// Reads from a seeded collection; every write fails.
    struct ReadOnlyStorage(MemoryStorage);

    #[async_trait]
    impl TodoStorage for ReadOnlyStorage {
        async fn init(&self) -> Result<(), StorageError> {
            Ok(())
        }

        async fn load(&self) -> Result<Vec<Todo>, StorageError> {
            self.0.load().await
        }

        async fn save(&self, _todos: &[Todo]) -> Result<(), StorageError> {
            Err(StorageError::io(
                "readonly.json",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn store() -> TodoStore {
        TodoStore::with_clock(
            Arc::new(MemoryStorage::new()),
            Arc::new(SteppingClock::new()),
        )
    }

    #[tokio::test]
    async fn create_applies_defaults_and_trims() {
        let store = store();
        let todo = store.create(CreateTodo::new(" Buy milk ")).await.unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, "");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[tokio::test]
    async fn create_reports_all_violations() {
        let store = store();
        let input = CreateTodo {
            title: Some(json!("")),
            description: None,
            completed: Some(json!("yes")),
        };
        match store.create(input).await {
            Err(StoreError::Validation(errors)) => {
                assert_eq!(errors, vec![TITLE_REQUIRED, COMPLETED_NOT_BOOLEAN]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.list().await.count, 0);
    }

    #[tokio::test]
    async fn create_appends_at_the_end() {
        let store = store();
        let a = store.create(CreateTodo::new("a")).await.unwrap();
        let b = store.create(CreateTodo::new("b")).await.unwrap();
        let ids: Vec<_> = store.list().await.data.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn update_of_completed_keeps_other_fields() {
        let store = store();
        let created = store
            .create(CreateTodo::new("Walk dog").description("twice"))
            .await
            .unwrap();

        let updated = store
            .update(&created.id, UpdateTodo::default().completed(true))
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Walk dog");
        assert_eq!(updated.description, "twice");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_with_null_title_is_rejected() {
        let store = store();
        let created = store.create(CreateTodo::new("x")).await.unwrap();
        let input = UpdateTodo {
            title: Some(Value::Null),
            ..UpdateTodo::default()
        };
        assert!(matches!(
            store.update(&created.id, input).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.list().await.data[0], created);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = store();
        store.create(CreateTodo::new("x")).await.unwrap();
        let before = store.list().await;

        let err = store
            .update("missing", UpdateTodo::default().title("y"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = store();
        let created = store.create(CreateTodo::new("x")).await.unwrap();
        let upper = created.id.to_uppercase();
        assert!(matches!(
            store.delete(&upper).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let store = store();
        store.create(CreateTodo::new("a")).await.unwrap();
        let b = store.create(CreateTodo::new("b")).await.unwrap();
        store.create(CreateTodo::new("c")).await.unwrap();

        store
            .update(&b.id, UpdateTodo::default().title("B"))
            .await
            .unwrap();

        let titles: Vec<_> = store.list().await.data.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "B", "c"]);
    }

    #[tokio::test]
    async fn delete_returns_snapshot_and_keeps_order() {
        let store = store();
        let a = store.create(CreateTodo::new("a")).await.unwrap();
        let b = store.create(CreateTodo::new("b")).await.unwrap();
        let c = store.create(CreateTodo::new("c")).await.unwrap();

        let removed = store.delete(&b.id).await.unwrap();
        assert_eq!(removed, b);

        let remaining: Vec<_> = store.list().await.data.into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![a.id, c.id]);

        assert!(matches!(
            store.delete(&b.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_degrades_to_empty_on_read_failure() {
        let store = TodoStore::new(Arc::new(BrokenStorage));
        let list = store.list().await;
        assert!(list.data.is_empty());
        assert_eq!(list.count, 0);
    }

    #[tokio::test]
    async fn mutations_surface_read_failures() {
        let store = TodoStore::new(Arc::new(BrokenStorage));
        assert!(matches!(
            store.create(CreateTodo::new("x")).await,
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(
            store.delete("1").await,
            Err(StoreError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn mutations_surface_write_failures() {
        let seeded = store();
        let existing = seeded.create(CreateTodo::new("keep")).await.unwrap();
        let before = seeded.list().await;

        let store = TodoStore::new(Arc::new(ReadOnlyStorage(MemoryStorage::with_todos(
            before.data.clone(),
        ))));

        assert!(matches!(
            store.create(CreateTodo::new("new")).await,
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(
            store
                .update(&existing.id, UpdateTodo::default().completed(true))
                .await,
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(
            store.delete(&existing.id).await,
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.list().await, before);
    }
}
