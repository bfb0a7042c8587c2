pub mod auth;
pub mod common;
pub mod project;

pub use auth::{login, me, register, AuthResponse, LoginRequest, RegisterRequest};
pub use common::PaginationParams;
pub use project::{
    create_project, delete_project, get_project, list_projects, CreateProjectRequest,
    ProjectEnvelope, ProjectListEnvelope, ProjectResponse, ProjectSubmission,
};
