// Library crate for collabhub
// Exports modules for use by the server binary and tests

pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{create_project, delete_project, get_project, list_projects, login, me, register};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        // Project routes
        .route("/api/projects", post(create_project))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{id}", delete(delete_project))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(|| async { "Hello, collabhub!" }))
        // Public auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Protected routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
