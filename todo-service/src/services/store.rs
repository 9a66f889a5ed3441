use crate::models::{Todo, TodoInput};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[source] anyhow::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[source] anyhow::Error),

    #[error("cursor iteration failed: {0}")]
    Cursor(#[source] anyhow::Error),

    #[error("write failed: {0}")]
    Write(#[source] anyhow::Error),

    #[error("store unavailable")]
    Unavailable,

    #[error("store task failed: {0}")]
    Task(#[source] anyhow::Error),
}

/// Persistence operations behind the todo handlers.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Every todo, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError>;

    /// Sets the mutable fields and `updatedAt`; returns the matched count.
    async fn update(
        &self,
        id: ObjectId,
        input: &TodoInput,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Returns the deleted count.
    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
