use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::error::{AppError, AppResult};
use crate::models::{CreateProject, Project};

/// Project repository for database operations
pub struct ProjectRepository;

impl ProjectRepository {
    fn collection(db: &Database) -> Collection<Project> {
        db.collection::<Project>("projects")
    }

    /// Create a new project owned by the given user
    pub async fn create(db: &Database, owner: ObjectId, input: &CreateProject) -> AppResult<Project> {
        let mut project = Project {
            id: None,
            title: input.title.clone(),
            description: input.description.clone(),
            domain: input.domain.clone(),
            tech_stack: input.tech_stack.clone(),
            github_url: input.github_url.clone(),
            deployment_url: input.deployment_url.clone(),
            status: input.status,
            owner,
            project_photo: input.project_photo.clone(),
            requests: Vec::new(), // no collaboration requests at creation
            created_at: bson::DateTime::now(),
        };

        let result = Self::collection(db).insert_one(&project).await?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Insert did not return an ObjectId".to_string()))?;
        project.id = Some(id);

        Ok(project)
    }

    /// Find project by ID
    pub async fn find_by_id(db: &Database, id: ObjectId) -> AppResult<Project> {
        Self::collection(db)
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))
    }

    /// List projects owned by a user, newest first
    pub async fn list_by_owner(
        db: &Database,
        owner: ObjectId,
        limit: i64,
        offset: u64,
    ) -> AppResult<Vec<Project>> {
        let cursor = Self::collection(db)
            .find(doc! { "owner": owner })
            .sort(doc! { "createdAt": -1 })
            .skip(offset)
            .limit(limit)
            .await?;

        let projects = cursor.try_collect().await?;
        Ok(projects)
    }

    /// Count projects owned by a user
    pub async fn count_by_owner(db: &Database, owner: ObjectId) -> AppResult<u64> {
        let count = Self::collection(db)
            .count_documents(doc! { "owner": owner })
            .await?;

        Ok(count)
    }

    /// Delete a project (with ownership check)
    pub async fn delete_by_owner(db: &Database, id: ObjectId, owner: ObjectId) -> AppResult<()> {
        let result = Self::collection(db)
            .delete_one(doc! { "_id": id, "owner": owner })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Project".to_string()));
        }

        Ok(())
    }
}
