use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::media::ImageStore;

/// A recorded upload, kept so tests can inspect the exact buffer that was
/// handed to the store.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub folder: String,
    pub bytes: Vec<u8>,
    pub url: String,
}

/// In-memory image store for unit and integration testing
pub struct InMemoryImageStore {
    uploads: Mutex<Vec<StoredImage>>,
    fail_uploads: bool,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_uploads: false,
        }
    }

    /// A store whose uploads always fail, for abort-path tests
    pub fn failing() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            fail_uploads: true,
        }
    }

    /// Snapshot of everything uploaded so far
    pub fn uploads(&self) -> Vec<StoredImage> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for InMemoryImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, bytes: Vec<u8>, folder: &str) -> AppResult<String> {
        if self.fail_uploads {
            return Err(AppError::Upload("Simulated upload failure".to_string()));
        }

        let mut uploads = self.uploads.lock().unwrap();
        let url = format!(
            "https://images.example.test/{}/img-{}.jpg",
            folder,
            uploads.len() + 1
        );

        uploads.push(StoredImage {
            folder: folder.to_string(),
            bytes,
            url: url.clone(),
        });

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_returns_url_under_folder() {
        let store = InMemoryImageStore::new();
        let url = store.upload(vec![1, 2, 3], "project_photos").await.unwrap();

        assert!(url.contains("/project_photos/"));
        let uploads = store.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bytes, vec![1, 2, 3]);
        assert_eq!(uploads[0].url, url);
    }

    #[tokio::test]
    async fn failing_store_records_nothing() {
        let store = InMemoryImageStore::failing();
        let result = store.upload(vec![1], "project_photos").await;

        assert!(matches!(result, Err(AppError::Upload(_))));
        assert!(store.uploads().is_empty());
    }
}
