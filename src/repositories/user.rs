use bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::error::{AppError, AppResult};
use crate::models::{CreateUser, User};

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    fn collection(db: &Database) -> Collection<User> {
        db.collection::<User>("users")
    }

    /// Create the unique email index. Called once at startup.
    pub async fn ensure_indexes(db: &Database) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        Self::collection(db).create_index(index).await?;
        Ok(())
    }

    /// Create a new user
    pub async fn create(db: &Database, input: &CreateUser, password_hash: &str) -> AppResult<User> {
        let mut user = User {
            id: None,
            email: input.email.clone(),
            password_hash: password_hash.to_string(),
            name: input.name.clone(),
            projects: Vec::new(),
            created_at: bson::DateTime::now(),
        };

        let result = Self::collection(db).insert_one(&user).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("E11000") || msg.contains("duplicate key") {
                AppError::Conflict("Email already exists".to_string())
            } else {
                AppError::Database(msg)
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(db: &Database, id: ObjectId) -> AppResult<User> {
        Self::collection(db)
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Find user by email (for login)
    pub async fn find_by_email(db: &Database, email: &str) -> AppResult<User> {
        Self::collection(db)
            .find_one(doc! { "email": email })
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Check if email exists
    pub async fn email_exists(db: &Database, email: &str) -> AppResult<bool> {
        let count = Self::collection(db)
            .count_documents(doc! { "email": email })
            .await?;

        Ok(count > 0)
    }

    /// Append a project reference to the user's projects array
    pub async fn push_project(
        db: &Database,
        user_id: ObjectId,
        project_id: ObjectId,
    ) -> AppResult<()> {
        let result = Self::collection(db)
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "projects": project_id } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    /// Remove a project reference from the user's projects array
    pub async fn pull_project(
        db: &Database,
        user_id: ObjectId,
        project_id: ObjectId,
    ) -> AppResult<()> {
        let result = Self::collection(db)
            .update_one(
                doc! { "_id": user_id },
                doc! { "$pull": { "projects": project_id } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}
