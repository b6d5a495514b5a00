//! Persistence seams for identities and tasks.
//!
//! Handlers never talk to a database directly: they receive trait objects
//! constructed once at startup. [`PgStore`] is the production backend,
//! [`InMemoryStore`] backs the test-suite and local experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Task, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend could not be reached (pool exhausted or closed, I/O failure).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Identity persistence. Usernames are unique; enforcing that is the backend's job.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new identity and assigns its id.
    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn insert_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: i32) -> StoreResult<Option<User>>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks owned by `user_id`, newest first.
    async fn list_tasks(&self, user_id: i32) -> StoreResult<Vec<Task>>;

    async fn insert_task(&self, task: Task) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Overwrites the mutable columns of an existing task and returns the stored row.
    async fn update_task(&self, task: Task) -> StoreResult<Task>;

    /// Returns `false` when no task with that id existed.
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}
