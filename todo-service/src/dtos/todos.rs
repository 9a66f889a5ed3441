use crate::models::Todo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-facing shape of a todo: the ObjectId is rendered as hex under `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.map(|id| id.to_hex()),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub message: String,
}

impl DeleteTodoResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Todo deleted successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now_millis, TodoInput};

    #[test]
    fn response_uses_hex_id_and_camel_case() {
        let todo = Todo::new(
            TodoInput {
                title: "Buy milk".to_string(),
                ..Default::default()
            },
            now_millis(),
        );
        let hex = todo.id.unwrap().to_hex();

        let json = serde_json::to_value(TodoResponse::from(todo)).unwrap();
        assert_eq!(json["id"], hex);
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn missing_id_is_omitted() {
        let mut todo = Todo::new(TodoInput::default(), now_millis());
        todo.id = None;

        let json = serde_json::to_value(TodoResponse::from(todo)).unwrap();
        assert!(json.get("id").is_none());
    }
}
