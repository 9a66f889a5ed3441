//! Application startup and lifecycle management.

use crate::config::TodoConfig;
use crate::handlers;
use crate::services::{MongoDb, MongoTodoStore, TodoStore};
use axum::{extract::Request, middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/:id",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/health/live", get(handlers::liveness_check))
        .route("/health/ready", get(handlers::readiness_check))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = tracing::field::Empty,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
    db: Option<MongoDb>,
    shutdown_grace: Duration,
}

impl Application {
    /// Connects to MongoDB and binds the listener. Failing to reach the
    /// database is fatal.
    pub async fn build(config: TodoConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        let store: Arc<dyn TodoStore> = Arc::new(MongoTodoStore::new(db.clone()));
        let mut app = Self::build_with_store(config, store).await?;
        app.db = Some(db);
        Ok(app)
    }

    /// Builds the application around an arbitrary store. No database
    /// connection is owned, so nothing is disconnected on shutdown.
    pub async fn build_with_store(
        config: TodoConfig,
        store: Arc<dyn TodoStore>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(store),
            db: None,
            shutdown_grace: config.shutdown_grace(),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests for at
    /// most the grace period and close the database connection.
    pub async fn run_until<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let draining = CancellationToken::new();
        let trigger = draining.clone();

        let server = axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(async move {
                signal.await;
                trigger.cancel();
            })
            .into_future();
        tokio::pin!(server);

        let result = tokio::select! {
            result = &mut server => result,
            _ = draining.cancelled() => {
                match tokio::time::timeout(self.shutdown_grace, &mut server).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(
                            grace_secs = self.shutdown_grace.as_secs(),
                            "Grace period elapsed with requests still in flight"
                        );
                        Ok(())
                    }
                }
            }
        };

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }

        if let Some(db) = self.db {
            db.disconnect().await;
        }

        tracing::info!("Server gracefully stopped");
        result
    }
}
