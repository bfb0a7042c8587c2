pub mod cloudinary;
pub mod memory;

pub use cloudinary::CloudinaryStore;
pub use memory::InMemoryImageStore;

use async_trait::async_trait;

use crate::error::AppResult;

/// Logical folder for project photos on the image host
pub const PROJECT_PHOTO_FOLDER: &str = "project_photos";

/// Image store trait for abstracting the external image-hosting service.
/// Follows the async_trait pattern used by the repositories.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload an encoded image under a logical folder, returning the
    /// durable, publicly resolvable URL assigned by the host.
    async fn upload(&self, bytes: Vec<u8>, folder: &str) -> AppResult<String>;
}
