pub mod project;
pub mod user;

pub use project::{CreateProject, Project, ProjectStatus, TechStackInput};
pub use user::{CreateUser, User, UserResponse};
