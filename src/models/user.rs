use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User document as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// References to projects owned by this user
    pub projects: Vec<ObjectId>,
    pub created_at: bson::DateTime,
}

/// User creation DTO (without id, projects and timestamp)
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
}

/// Public user response (safe to return via API)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub projects: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            projects: user.projects.iter().map(|id| id.to_hex()).collect(),
        }
    }
}
