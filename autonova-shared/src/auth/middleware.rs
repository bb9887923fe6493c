/// Bearer-token authentication
///
/// Turns an `Authorization: Bearer <token>` header into an [`AuthContext`]:
/// the token is validated as an access token, then the user's role and
/// active flag are loaded from the database. The context is inserted into
/// request extensions by the API's auth layer and extracted by handlers.
///
/// Failure modes map onto the API taxonomy: missing/invalid/expired
/// credentials are 401, a malformed header is 400, and a deactivated
/// account is 403 even when its token is otherwise valid.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::role::RoleName;
use crate::models::user::User;

/// Authentication context for a request
///
/// Everything a handler needs to authorize and attribute the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Login name, for log lines
    pub username: String,

    /// The user's current role, freshly loaded from the database
    pub role: RoleName,
}

/// Error type for the authentication step
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token validation failed (bad signature, expired, wrong type, ...)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is valid but the user no longer exists
    #[error("User not found")]
    UnknownUser,

    /// Token is valid but the account has been deactivated
    #[error("User account is inactive")]
    Inactive,

    /// Database error during the user lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Extracts the Bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)
}

/// Authenticates a request from its headers
///
/// Validates the access token, then resolves the user's role and active
/// flag in a single query. Expired tokens and bad signatures both surface
/// as [`AuthError::InvalidToken`] with the specific reason in the message.
///
/// # Example
///
/// ```no_run
/// # use autonova_shared::auth::middleware::authenticate;
/// # use axum::http::HeaderMap;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool, headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let auth = authenticate(&pool, "jwt-secret", &headers).await?;
/// println!("request from {} ({})", auth.username, auth.role);
/// # Ok(())
/// # }
/// ```
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidSignature => AuthError::InvalidToken("Invalid signature".to_string()),
        other => AuthError::InvalidToken(other.to_string()),
    })?;

    let user = User::find_with_role(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    if !user.is_active {
        return Err(AuthError::Inactive);
    }

    Ok(AuthContext {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}
