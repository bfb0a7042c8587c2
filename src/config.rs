use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub mongodb_url: String,
    pub mongodb_database: String,

    // JWT
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,

    // Image hosting
    pub cloudinary: CloudinaryConfig,

    // Server
    pub host: String,
    pub port: u16,
}

/// Credentials for the external image-hosting service
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Database
            mongodb_url: env::var("MONGODB_URL")
                .map_err(|_| ConfigError::Missing("MONGODB_URL"))?,
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "collabhub".to_string()),

            // JWT
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRATION_HOURS"))?,

            // Image hosting
            cloudinary: CloudinaryConfig {
                cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
                api_key: env::var("CLOUDINARY_API_KEY")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_API_KEY"))?,
                api_secret: env::var("CLOUDINARY_API_SECRET")
                    .map_err(|_| ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
            },

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
