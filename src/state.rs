use std::sync::Arc;

use mongodb::Client as MongoClient;

use crate::config::Config;
use crate::media::{CloudinaryStore, ImageStore};
use crate::repositories::UserRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub mongo_client: MongoClient,
    pub config: Config,
    /// Image-hosting client, injected so handlers stay testable without
    /// real credentials
    pub image_store: Arc<dyn ImageStore>,
}

impl AppState {
    /// Create a new AppState by connecting to the database and building the
    /// production image store from the configured credentials
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let image_store: Arc<dyn ImageStore> = Arc::new(CloudinaryStore::new(&config.cloudinary));
        Self::with_image_store(config, image_store).await
    }

    /// Create AppState with a custom image store (for testing)
    pub async fn with_image_store(
        config: Config,
        image_store: Arc<dyn ImageStore>,
    ) -> Result<Self, AppStateError> {
        let mongo_client = MongoClient::with_uri_str(&config.mongodb_url)
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;

        let state = Self {
            mongo_client,
            config,
            image_store,
        };

        UserRepository::ensure_indexes(&state.mongo_db())
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;

        Ok(state)
    }

    /// Get MongoDB database (configurable via MONGODB_DATABASE env var)
    pub fn mongo_db(&self) -> mongodb::Database {
        self.mongo_client.database(&self.config.mongodb_database)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("MongoDB connection error: {0}")]
    Mongo(String),
}
