use mongodb::{bson::doc, Client as MongoClient, Collection, Database};
use service_core::error::AppError;

/// Shared MongoDB handle. Cloning is cheap; the driver pools connections internally.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);

        let handle = Self { client, db };
        handle.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(handle)
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Close pooled connections. Waits for in-flight operations to finish.
    pub async fn close(self) {
        tracing::info!("Closing MongoDB connection");
        self.client.shutdown().await;
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
