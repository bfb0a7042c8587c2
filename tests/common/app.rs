use std::sync::Arc;

use axum_test::TestServer;
use collabhub::build_router;
use collabhub::config::{CloudinaryConfig, Config};
use collabhub::media::InMemoryImageStore;
use collabhub::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    dotenvy::dotenv().ok();

    Config {
        mongodb_url: std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        mongodb_database: "collabhub_test".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expiration_hours: 24,
        cloudinary: CloudinaryConfig {
            cloud_name: "test-cloud".to_string(),
            api_key: "test-key".to_string(),
            api_secret: "test-secret".to_string(),
        },
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Concrete handle to the image store so tests can inspect uploads
    pub image_store: Arc<InMemoryImageStore>,
}

impl TestApp {
    /// Create a new test application backed by an in-memory image store
    pub async fn new() -> Self {
        Self::with_store(Arc::new(InMemoryImageStore::new())).await
    }

    /// Create a test application whose image uploads always fail
    pub async fn with_failing_uploads() -> Self {
        Self::with_store(Arc::new(InMemoryImageStore::failing())).await
    }

    async fn with_store(image_store: Arc<InMemoryImageStore>) -> Self {
        let config = test_config();

        let state = AppState::with_image_store(config, image_store.clone())
            .await
            .expect("Failed to create test app state");

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            image_store,
        }
    }
}
