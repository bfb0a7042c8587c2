pub mod project;
pub mod user;

pub use project::ProjectRepository;
pub use user::UserRepository;
