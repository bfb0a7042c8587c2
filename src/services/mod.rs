pub mod auth;
pub mod image;

pub use auth::{AuthService, Claims};
