use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A todo as stored in the `todos` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(input: TodoInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Some(ObjectId::new()),
            title: input.title,
            description: input.description,
            completed: input.completed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place. `id` and `created_at` are never touched;
    /// `updated_at` always moves forward by at least a millisecond.
    pub fn apply(&mut self, input: &TodoInput, now: DateTime<Utc>) {
        self.title = input.title.clone();
        self.description = input.description.clone();
        self.completed = input.completed;
        self.updated_at = now.max(self.updated_at + chrono::Duration::milliseconds(1));
    }
}

/// Client-supplied fields for create and update. Missing fields take their
/// zero value; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TodoInput {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Current time truncated to what a BSON date can hold, so a freshly built
/// todo compares equal to the one read back from the store.
pub fn now_millis() -> DateTime<Utc> {
    mongodb::bson::DateTime::now().to_chrono()
}
