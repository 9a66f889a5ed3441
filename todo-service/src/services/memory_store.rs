use crate::models::{Todo, TodoInput};
use crate::services::store::{StoreError, TodoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Insert,
    FindAll,
    FindById,
    Update,
    Delete,
    Ping,
}

/// The kind of [`StoreError`] an injected failure produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Query,
    Decode,
    Cursor,
    Write,
}

impl InjectedFailure {
    fn into_error(self, op: StoreOperation) -> StoreError {
        let source = anyhow::anyhow!("injected failure on {:?}", op);
        match self {
            InjectedFailure::Query => StoreError::Query(source),
            InjectedFailure::Decode => StoreError::Decode(source),
            InjectedFailure::Cursor => StoreError::Cursor(source),
            InjectedFailure::Write => StoreError::Write(source),
        }
    }
}

/// Insertion-ordered store held in process memory. It can be switched
/// offline to simulate an unreachable database, or told to fail single
/// operations with a chosen error kind.
pub struct InMemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
    available: AtomicBool,
    failures: Mutex<HashMap<StoreOperation, InjectedFailure>>,
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self {
            todos: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
            failures: Mutex::new(HashMap::new()),
        }
    }
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Makes every later call of `op` fail with `failure` until cleared.
    pub fn fail_on(&self, op: StoreOperation, failure: InjectedFailure) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(op, failure);
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }

    fn check_available(&self, op: StoreOperation) -> Result<(), StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&op)
            .copied();
        match failure {
            Some(failure) => Err(failure.into_error(op)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        self.check_available(StoreOperation::Insert)?;
        let mut todos = self.todos.write().await;
        if todo.id.is_some() && todos.iter().any(|t| t.id == todo.id) {
            return Err(StoreError::Write(anyhow::anyhow!(
                "duplicate key: {:?}",
                todo.id
            )));
        }
        let mut stored = todo.clone();
        if stored.id.is_none() {
            stored.id = Some(ObjectId::new());
        }
        todos.push(stored);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        self.check_available(StoreOperation::FindAll)?;
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        self.check_available(StoreOperation::FindById)?;
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn update(
        &self,
        id: ObjectId,
        input: &TodoInput,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.check_available(StoreOperation::Update)?;
        let mut todos = self.todos.write().await;
        match todos.iter_mut().find(|t| t.id == Some(id)) {
            Some(todo) => {
                todo.apply(input, now);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        self.check_available(StoreOperation::Delete)?;
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != Some(id));
        Ok((before - todos.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available(StoreOperation::Ping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::now_millis;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let store = InMemoryTodoStore::new();
        for title in ["first", "second", "third"] {
            store
                .insert(&Todo::new(input(title), now_millis()))
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = InMemoryTodoStore::new();
        let todo = Todo::new(input("once"), now_millis());
        store.insert(&todo).await.unwrap();

        let err = store.insert(&todo).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_counts() {
        let store = InMemoryTodoStore::new();
        let todo = Todo::new(input("count me"), now_millis());
        let id = todo.id.unwrap();
        store.insert(&todo).await.unwrap();

        assert_eq!(store.update(id, &input("renamed"), now_millis()).await.unwrap(), 1);
        assert_eq!(store.update(ObjectId::new(), &input("x"), now_millis()).await.unwrap(), 0);
        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert_eq!(store.delete(id).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = InMemoryTodoStore::new();
        store.set_available(false);

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable)));
        assert!(matches!(store.find_all().await, Err(StoreError::Unavailable)));
        assert!(matches!(
            store.find_by_id(ObjectId::new()).await,
            Err(StoreError::Unavailable)
        ));

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn injected_failure_hits_only_its_operation() {
        let store = InMemoryTodoStore::new();
        let todo = Todo::new(input("kept"), now_millis());
        let id = todo.id.unwrap();
        store.insert(&todo).await.unwrap();

        store.fail_on(StoreOperation::FindAll, InjectedFailure::Cursor);
        store.fail_on(StoreOperation::Update, InjectedFailure::Write);

        assert!(matches!(store.find_all().await, Err(StoreError::Cursor(_))));
        assert!(matches!(
            store.update(id, &input("nope"), now_millis()).await,
            Err(StoreError::Write(_))
        ));
        assert!(store.find_by_id(id).await.unwrap().is_some());
        assert!(store.ping().await.is_ok());

        store.clear_failures();
        assert_eq!(store.find_all().await.unwrap().len(), 1);
        assert_eq!(store.find_by_id(id).await.unwrap().unwrap().title, "kept");
    }
}
