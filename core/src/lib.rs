//! Durable todo collection with whole-document persistence.
//!
//! # Overview
//! `TodoStore` exposes list, create, update and delete over a collection
//! that is loaded and saved as one unit through a `TodoStorage` backend.
//! The crate has no HTTP types; a front end decodes requests into
//! `CreateTodo` / `UpdateTodo` and maps `StoreError` back onto responses.
//!
//! # Design
//! - Writers are serialized inside the store, readers are not.
//! - Validation reports every violated rule, never just the first.
//! - Ids are random and checked against the loaded collection before use.
//! - Storage is injected: `JsonFileStorage` for deployments,
//!   `MemoryStorage` for tests.

pub mod clock;
pub mod error;
pub mod ids;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use error::{StorageError, StoreError};
pub use storage::{JsonFileStorage, MemoryStorage, TodoStorage};
pub use store::TodoStore;
pub use types::{CreateTodo, Todo, TodoList, UpdateTodo};
