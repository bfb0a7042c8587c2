use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use bson::oid::ObjectId;

use crate::error::AppError;
use crate::services::{AuthService, Claims};
use crate::state::AppState;

/// Authenticated user info extracted from JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub email: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        Ok(Self {
            id,
            email: claims.email,
        })
    }
}

/// Extractor for AuthUser - can be used directly in handlers
/// Example: `async fn handler(user: AuthUser) -> ... { }`
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Auth middleware - validates JWT and injects AuthUser into request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract token from Authorization header
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    // Verify token and get claims
    let claims = AuthService::verify_token(token, &state.config)?;

    // Insert AuthUser into request extensions
    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    // Continue to handler
    Ok(next.run(request).await)
}
