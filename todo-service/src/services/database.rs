use mongodb::{
    bson::doc, options::ClientOptions, Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use std::time::Duration;

pub const TODOS_COLLECTION: &str = "todos";

/// Bound on establishing the connection and on the startup ping.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide MongoDB handle. Cloning shares the driver's connection pool.
#[derive(Clone, Debug)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Connects and pings; a server that does not answer within
    /// [`CONNECT_TIMEOUT`] (or the URI's own timeouts) is an error.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB connection string {}: {}", uri, e);
            AppError::from(e)
        })?;
        // Timeouts given in the URI take precedence
        if options.connect_timeout.is_none() {
            options.connect_timeout = Some(CONNECT_TIMEOUT);
        }
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(CONNECT_TIMEOUT);
        }

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let handle = Self { client, db };

        tokio::time::timeout(CONNECT_TIMEOUT, handle.ping())
            .await
            .map_err(|_| {
                tracing::error!("Timed out pinging MongoDB at {}", uri);
                AppError::DatabaseError(anyhow::anyhow!(
                    "ping did not complete within {:?}",
                    CONNECT_TIMEOUT
                ))
            })??;

        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(handle)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the pool. Outstanding clones must not be used afterwards.
    pub async fn disconnect(self) {
        self.client.shutdown().await;
        tracing::info!("Connection to MongoDB closed");
    }
}
