use crate::models::{Todo, TodoInput};
use crate::services::database::{MongoDb, TODOS_COLLECTION};
use crate::services::store::{StoreError, TodoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    error::ErrorKind,
    Collection,
};

/// [`TodoStore`] over the `todos` collection.
#[derive(Clone)]
pub struct MongoTodoStore {
    db: MongoDb,
    todos: Collection<Todo>,
}

impl MongoTodoStore {
    pub fn new(db: MongoDb) -> Self {
        let todos = db.collection(TODOS_COLLECTION);
        Self { db, todos }
    }
}

fn is_decode_error(err: &mongodb::error::Error) -> bool {
    matches!(*err.kind, ErrorKind::BsonDeserialization(_))
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        self.todos.insert_one(todo, None).await.map_err(|e| {
            tracing::error!("Failed to insert todo: {}", e);
            StoreError::Write(e.into())
        })?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut cursor = self.todos.find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to query todos: {}", e);
            StoreError::Query(e.into())
        })?;

        let mut todos = Vec::new();
        while let Some(todo) = cursor.try_next().await.map_err(|e| {
            tracing::error!("Failed to read todos cursor: {}", e);
            if is_decode_error(&e) {
                StoreError::Decode(e.into())
            } else {
                StoreError::Cursor(e.into())
            }
        })? {
            todos.push(todo);
        }
        Ok(todos)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Todo>, StoreError> {
        self.todos
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %id, "Failed to find todo: {}", e);
                if is_decode_error(&e) {
                    StoreError::Decode(e.into())
                } else {
                    StoreError::Query(e.into())
                }
            })
    }

    async fn update(
        &self,
        id: ObjectId,
        input: &TodoInput,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        // Pipeline form so `updatedAt` can be floored at the stored value
        // plus one millisecond. User strings go through `$literal` so a
        // leading `$` is not read as a field path.
        let update = vec![doc! {
            "$set": {
                "title": { "$literal": input.title.as_str() },
                "description": { "$literal": input.description.as_str() },
                "completed": input.completed,
                "updatedAt": {
                    "$max": [BsonDateTime::from_chrono(now), { "$add": ["$updatedAt", 1] }]
                },
            }
        }];

        let result = self
            .todos
            .update_one(doc! { "_id": id }, update, None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %id, "Failed to update todo: {}", e);
                StoreError::Write(e.into())
            })?;
        Ok(result.matched_count)
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError> {
        let result = self
            .todos
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(todo_id = %id, "Failed to delete todo: {}", e);
                StoreError::Write(e.into())
            })?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(|_| StoreError::Unavailable)
    }
}
