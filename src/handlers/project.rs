use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::PaginationParams;
use crate::media::PROJECT_PHOTO_FOLDER;
use crate::middlewares::AuthUser;
use crate::models::{CreateProject, Project, ProjectStatus, TechStackInput};
use crate::repositories::{ProjectRepository, UserRepository};
use crate::services::image;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub domain: String,
    #[serde(rename = "techStack")]
    pub tech_stack: TechStackInput,
    #[serde(rename = "githubURL", default)]
    pub github_url: Option<String>,
    #[serde(rename = "deploymentURL", default)]
    pub deployment_url: Option<String>,
    pub status: ProjectStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    #[serde(rename = "techStack")]
    pub tech_stack: Vec<String>,
    #[serde(rename = "githubURL", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(rename = "deploymentURL", skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    pub status: ProjectStatus,
    pub owner: String,
    #[serde(rename = "projectPhoto", skip_serializing_if = "Option::is_none")]
    pub project_photo: Option<String>,
    pub requests: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl TryFrom<Project> for ProjectResponse {
    type Error = AppError;

    fn try_from(p: Project) -> Result<Self, Self::Error> {
        let id = p
            .id
            .ok_or_else(|| AppError::Internal("Project document missing _id".to_string()))?;
        let created_at = p
            .created_at
            .try_to_rfc3339_string()
            .map_err(|e| AppError::Internal(format!("Invalid createdAt: {}", e)))?;

        Ok(Self {
            id: id.to_hex(),
            title: p.title,
            description: p.description,
            domain: p.domain,
            tech_stack: p.tech_stack,
            github_url: p.github_url,
            deployment_url: p.deployment_url,
            status: p.status,
            owner: p.owner.to_hex(),
            project_photo: p.project_photo,
            requests: p.requests.iter().map(|id| id.to_hex()).collect(),
            created_at,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectEnvelope {
    pub success: bool,
    pub data: ProjectResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListEnvelope {
    pub success: bool,
    pub data: Vec<ProjectResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

// ============ Submission extractor ============

/// Project fields plus the optional raw photo bytes, extracted from either
/// a JSON body or a multipart form.
///
/// JSON clients send techStack as a structured list (or a serialized
/// string); multipart clients send text fields plus an optional `photo`
/// file part, and techStack necessarily arrives as a string.
pub struct ProjectSubmission {
    pub fields: CreateProjectRequest,
    pub photo: Option<Vec<u8>>,
}

impl<S> FromRequest<S> for ProjectSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(fields) = Json::<CreateProjectRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self {
                fields,
                photo: None,
            })
        }
    }
}

impl ProjectSubmission {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut title = None;
        let mut description = None;
        let mut domain = None;
        let mut tech_stack = None;
        let mut github_url = None;
        let mut deployment_url = None;
        let mut status = None;
        let mut photo = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "photo" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?;
                    photo = Some(bytes.to_vec());
                }
                "title" => title = Some(Self::text(field).await?),
                "description" => description = Some(Self::text(field).await?),
                "domain" => domain = Some(Self::text(field).await?),
                "techStack" => tech_stack = Some(TechStackInput::Raw(Self::text(field).await?)),
                "githubURL" => github_url = non_empty(Self::text(field).await?),
                "deploymentURL" => deployment_url = non_empty(Self::text(field).await?),
                "status" => status = Some(Self::text(field).await?.parse::<ProjectStatus>()?),
                // Unknown fields are ignored, matching lenient form handling
                _ => {}
            }
        }

        let fields = CreateProjectRequest {
            title: require(title, "title")?,
            description: require(description, "description")?,
            domain: require(domain, "domain")?,
            tech_stack: require(tech_stack, "techStack")?,
            github_url,
            deployment_url,
            status: require(status, "status")?,
        };

        Ok(Self { fields, photo })
    }

    async fn text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
        field
            .text()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============ Handlers ============

/// Create a new project owned by the authenticated user.
///
/// Strictly sequential flow: resize and upload the photo (if any), resolve
/// the tech stack, insert the project document, then push the new id onto
/// the owner's projects array. Any failure aborts before the steps that
/// follow it; there is no compensating rollback if the owner link fails
/// after the project insert.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ProjectEnvelope),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Image upload failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    submission: ProjectSubmission,
) -> AppResult<(StatusCode, Json<ProjectEnvelope>)> {
    let ProjectSubmission { fields, photo } = submission;
    let db = state.mongo_db();

    // The owner must resolve to an existing user before any side effect
    UserRepository::find_by_id(&db, user.id).await?;

    // Resize, re-encode and upload the photo before touching the database
    let project_photo = match photo {
        Some(raw) => {
            let processed = image::process_project_photo(&raw)?;
            let url = state
                .image_store
                .upload(processed, PROJECT_PHOTO_FOLDER)
                .await?;
            Some(url)
        }
        None => None,
    };

    let tech_stack = fields.tech_stack.normalize()?;

    let create = CreateProject {
        title: fields.title,
        description: fields.description,
        domain: fields.domain,
        tech_stack,
        github_url: fields.github_url,
        deployment_url: fields.deployment_url,
        status: fields.status,
        project_photo,
    };

    let project = ProjectRepository::create(&db, user.id, &create).await?;
    let project_id = project
        .id
        .ok_or_else(|| AppError::Internal("Project document missing _id".to_string()))?;

    // Link the project to its owner; depends on the insert above
    UserRepository::push_project(&db, user.id, project_id).await?;

    tracing::info!(project_id = %project_id, owner = %user.id, "project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            success: true,
            data: project.try_into()?,
        }),
    ))
}

/// List the authenticated user's projects
#[utoipa::path(
    get,
    path = "/api/projects",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of projects", body = ProjectListEnvelope),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn list_projects(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ProjectListEnvelope>> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0) as u64;

    let db = state.mongo_db();
    let projects = ProjectRepository::list_by_owner(&db, user.id, limit, offset).await?;
    let total = ProjectRepository::count_by_owner(&db, user.id).await?;

    let data = projects
        .into_iter()
        .map(ProjectResponse::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(ProjectListEnvelope {
        success: true,
        data,
        total,
        limit: limit as u64,
        offset,
    }))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectEnvelope),
        (status = 400, description = "Invalid project ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn get_project(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectEnvelope>> {
    let id = ObjectId::parse_str(&id)?;
    let project = ProjectRepository::find_by_id(&state.mongo_db(), id).await?;

    Ok(Json(ProjectEnvelope {
        success: true,
        data: project.try_into()?,
    }))
}

/// Delete a project owned by the authenticated user
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Projects"
)]
pub async fn delete_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = ObjectId::parse_str(&id)?;
    let db = state.mongo_db();

    ProjectRepository::delete_by_owner(&db, id, user.id).await?;
    UserRepository::pull_project(&db, user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            id: Some(ObjectId::new()),
            title: "Chat App".to_string(),
            description: "Realtime chat".to_string(),
            domain: "web".to_string(),
            tech_stack: vec!["Go".to_string(), "React".to_string()],
            github_url: None,
            deployment_url: Some("https://chat.example.com".to_string()),
            status: ProjectStatus::InProgress,
            owner: ObjectId::new(),
            project_photo: None,
            requests: Vec::new(),
            created_at: bson::DateTime::now(),
        }
    }

    #[test]
    fn response_uses_platform_field_names() {
        let response = ProjectResponse::try_from(sample_project()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("_id").is_some());
        assert_eq!(json["techStack"], serde_json::json!(["Go", "React"]));
        assert_eq!(json["deploymentURL"], "https://chat.example.com");
        assert_eq!(json["status"], "in-progress");
        // Absent optionals are omitted entirely, not serialized as null
        assert!(json.get("projectPhoto").is_none());
        assert!(json.get("githubURL").is_none());
    }

    #[test]
    fn response_requires_an_id() {
        let mut project = sample_project();
        project.id = None;

        assert!(matches!(
            ProjectResponse::try_from(project),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn json_request_accepts_both_tech_stack_shapes() {
        let from_list: CreateProjectRequest = serde_json::from_str(
            r#"{"title":"A","description":"B","domain":"web","techStack":["React"],"status":"planning"}"#,
        )
        .unwrap();
        assert!(matches!(from_list.tech_stack, TechStackInput::List(_)));

        let from_string: CreateProjectRequest = serde_json::from_str(
            r#"{"title":"A","description":"B","domain":"web","techStack":"[\"React\"]","status":"planning"}"#,
        )
        .unwrap();
        assert!(matches!(from_string.tech_stack, TechStackInput::Raw(_)));
    }
}
