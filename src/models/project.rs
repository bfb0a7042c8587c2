use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Project document as stored in the `projects` collection.
///
/// Field names match the platform's existing camelCase documents so that
/// records written by this service stay readable by the other consumers of
/// the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub tech_stack: Vec<String>,
    #[serde(rename = "githubURL", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(rename = "deploymentURL", skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    pub status: ProjectStatus,
    pub owner: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_photo: Option<String>,
    pub requests: Vec<ObjectId>,
    pub created_at: bson::DateTime,
}

/// Project lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
        }
    }
}

// Multipart form fields arrive as plain text, so the status needs a
// string parser in addition to its serde representation.
impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(ProjectStatus::Planning),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(AppError::Validation(format!(
                "Unknown project status: {}",
                other
            ))),
        }
    }
}

/// Tech stack as submitted by a client.
///
/// JSON clients send the structured list directly; form-encoded clients can
/// only send text, so the same list arrives as a JSON-serialized string.
/// Both shapes resolve to one canonical `Vec<String>` before anything is
/// persisted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum TechStackInput {
    List(Vec<String>),
    Raw(String),
}

impl TechStackInput {
    /// Resolve to the canonical ordered list of technology names
    pub fn normalize(self) -> AppResult<Vec<String>> {
        match self {
            TechStackInput::List(list) => Ok(list),
            TechStackInput::Raw(raw) => serde_json::from_str(&raw)
                .map_err(|e| AppError::Validation(format!("Malformed techStack: {}", e))),
        }
    }
}

/// Project creation DTO (without id, requests and timestamp)
#[derive(Debug)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub domain: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub deployment_url: Option<String>,
    pub status: ProjectStatus,
    pub project_photo: Option<String>,
}
