//! Persistence backends for the todo collection.
//!
//! # Design
//! The whole collection is the unit of persistence: `load` returns every
//! record and `save` replaces every record. Backends do no locking of their
//! own; `TodoStore` serializes writers.
//!
//! `JsonFileStorage` writes the new document to a sibling temp file and
//! renames it over the target, so a reader sees either the old document or
//! the new one, never a prefix of it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::types::Todo;

/// Load/save contract for the todo collection.
#[async_trait]
pub trait TodoStorage: Send + Sync + 'static {
    /// Prepare the medium, creating an empty collection if none exists.
    async fn init(&self) -> Result<(), StorageError>;

    async fn load(&self) -> Result<Vec<Todo>, StorageError>;

    async fn save(&self, todos: &[Todo]) -> Result<(), StorageError>;
}

/// A single pretty-printed JSON array on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "todos.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_atomic(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))
    }
}

#[async_trait]
impl TodoStorage for JsonFileStorage {
    async fn init(&self) -> Result<(), StorageError> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?
        {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        tracing::info!(path = %self.path.display(), "creating empty todo collection");
        self.write_atomic(b"[]").await
    }

    async fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(todos).map_err(StorageError::Encode)?;
        self.write_atomic(&bytes).await
    }
}

/// In-process collection, used by tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }
}

#[async_trait]
impl TodoStorage for MemoryStorage {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Todo>, StorageError> {
        Ok(self.todos.read().await.clone())
    }

    async fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        *self.todos.write().await = todos.to_vec();
        Ok(())
    }
}
