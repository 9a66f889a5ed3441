#![allow(dead_code)]

use reqwest::{Client, Response};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use todo_service::config::{MongoConfig, TodoConfig};
use todo_service::services::{InMemoryTodoStore, TodoStore};
use todo_service::startup::Application;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
    pub store: Arc<InMemoryTodoStore>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<std::io::Result<()>>>,
}

pub fn test_config() -> TodoConfig {
    TodoConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("todo_test_{}", uuid::Uuid::new_v4().simple()),
        },
        shutdown_grace_secs: 1,
    }
}

impl TestApp {
    /// Spawn the service on a random port over a fresh in-memory store.
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryTodoStore::new());
        let dyn_store: Arc<dyn TodoStore> = store.clone();

        let app = Application::build_with_store(test_config(), dyn_store)
            .await
            .expect("Failed to build test application");

        Self::start(app, store).await
    }

    /// Spawn an application that was built elsewhere (e.g. against MongoDB).
    pub async fn start(app: Application, store: Arc<InMemoryTodoStore>) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(app.run_until(async move {
            let _ = rx.await;
        }));

        // Wait for HTTP server to be ready by polling the liveness endpoint
        let client = Client::new();
        let live_url = format!("{}/health/live", address);
        for _ in 0..50 {
            if client.get(&live_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            client,
            store,
            shutdown: Some(tx),
            server: Some(server),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_todo(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/todos"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_todo(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(self.url(&format!("/api/todos/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_todo(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/todos/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_todo(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/api/todos/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_todos(&self) -> Response {
        self.client
            .get(self.url("/api/todos"))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a todo and return the response body.
    pub async fn create_todo(&self, title: &str) -> Value {
        let response = self
            .post_todo(&serde_json::json!({ "title": title }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse response")
    }

    /// Signal shutdown and wait for the server task to finish.
    pub async fn stop(mut self) -> std::io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.server.take() {
            Some(server) => server.await.expect("Server task panicked"),
            None => Ok(()),
        }
    }
}

pub async fn error_message(response: Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse error body");
    body["error"]
        .as_str()
        .expect("Error body has no `error` field")
        .to_string()
}
