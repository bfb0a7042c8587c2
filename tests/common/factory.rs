use bson::oid::ObjectId;

use collabhub::models::{CreateProject, CreateUser, Project, ProjectStatus};
use collabhub::repositories::{ProjectRepository, UserRepository};
use collabhub::services::AuthService;
use collabhub::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: ObjectId,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test user and return auth info
    pub async fn create_user(&self) -> TestAuth {
        let unique_id = ObjectId::new().to_hex();
        let email = format!("test-{}@example.com", unique_id);
        let password = "TestPassword123!";

        let input = CreateUser {
            email: email.clone(),
            name: format!("Test User {}", unique_id),
        };

        let password_hash = AuthService::hash_password(password).unwrap();
        let user = UserRepository::create(&self.state.mongo_db(), &input, &password_hash)
            .await
            .unwrap();

        let user_id = user.id.unwrap();
        let token = AuthService::generate_token(user_id, &email, &self.state.config).unwrap();

        TestAuth {
            user_id,
            email,
            token,
        }
    }

    /// Create a test project linked to its owner
    pub async fn create_project(&self, owner: ObjectId) -> Project {
        let input = CreateProject {
            title: format!("Test Project {}", ObjectId::new().to_hex()),
            description: "Test project description".to_string(),
            domain: "web".to_string(),
            tech_stack: vec!["Rust".to_string(), "React".to_string()],
            github_url: None,
            deployment_url: None,
            status: ProjectStatus::Planning,
            project_photo: None,
        };

        let db = self.state.mongo_db();
        let project = ProjectRepository::create(&db, owner, &input).await.unwrap();
        UserRepository::push_project(&db, owner, project.id.unwrap())
            .await
            .unwrap();

        project
    }
}
