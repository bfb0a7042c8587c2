use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::config::CloudinaryConfig;
use crate::error::{AppError, AppResult};
use crate::media::ImageStore;

/// Cloudinary-backed image store.
///
/// Uploads go through the signed upload endpoint: the request carries the
/// API key, a timestamp and a SHA-256 signature over the non-credential
/// parameters plus the API secret.
pub struct CloudinaryStore {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

/// Relevant subset of the upload response
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryStore {
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }

    /// Sign the upload parameters (sorted key=value pairs, secret appended)
    fn sign(&self, folder: &str, timestamp: i64) -> String {
        let payload = format!("folder={}&timestamp={}{}", folder, timestamp, self.api_secret);
        let digest = Sha256::digest(payload.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload(&self, bytes: Vec<u8>, folder: &str) -> AppResult<String> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp();
        let signature = self.sign(folder, timestamp);

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")?;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature)
            .part("file", file_part);

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upload(format!(
                "Image host returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryStore {
        CloudinaryStore::new(&CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "abcd".to_string(),
        })
    }

    #[test]
    fn signature_is_deterministic_hex() {
        let store = store();
        let sig = store.sign("project_photos", 1700000000);

        assert_eq!(sig, store.sign("project_photos", 1700000000));
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_parameters() {
        let store = store();
        let sig = store.sign("project_photos", 1700000000);

        assert_ne!(sig, store.sign("project_photos", 1700000001));
        assert_ne!(sig, store.sign("avatars", 1700000000));
    }

    #[test]
    fn upload_url_targets_the_cloud() {
        assert_eq!(
            store().upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
