/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new staff account
/// - `POST /api/auth/login` - Login with username/password, get tokens
/// - `POST /api/auth/refresh` - Exchange a refresh token for an access token
/// - `GET  /api/auth/me` - Current user's profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldError},
    routes::common::validation_error,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use autonova_shared::{
    auth::{
        jwt::{self, Claims, TokenType},
        middleware::AuthContext,
        password,
    },
    models::{
        role::{Role, RoleName},
        user::{CreateUser, User},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user as returned by the API (no password hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub role: RoleName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserDto {
    fn from_user(user: User, role: RoleName) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            is_active: user.is_active,
            role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (checked for strength separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    /// Role to assign (must reference an existing role row)
    pub role_id: Uuid,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserDto,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (1 hour)
    pub access_token: String,

    /// Refresh token (30 days)
    pub refresh_token: String,

    pub user: UserDto,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (1 hour)
    pub access_token: String,
}

/// Current user response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserDto,
}

/// Register a new staff account
///
/// # Errors
///
/// - `400`: validation failed, weak password, or unknown role
/// - `409`: username or email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate().map_err(validation_error)?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::Validation(vec![FieldError::new("password", e)]))?;

    let role = Role::find_by_id(&state.db, req.role_id)
        .await?
        .ok_or_else(|| {
            ApiError::Validation(vec![FieldError::new("role_id", "Unknown role")])
        })?;

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate username/email surfaces as 409 via the unique constraints.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            role_id: role.id,
        },
    )
    .await?;

    tracing::info!(username = %user.username, role = %role.name, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserDto::from_user(user, role.name),
        }),
    ))
}

/// Login with username and password
///
/// Unknown username and wrong password produce the same 401 so the
/// endpoint does not confirm which usernames exist.
///
/// # Errors
///
/// - `400`: validation failed
/// - `401`: invalid credentials
/// - `403`: account is deactivated
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(validation_error)?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("User account is inactive".to_string()));
    }

    let role = Role::find_by_id(&state.db, user.role_id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("User {} has a dangling role", user.id)))?;

    let access_claims = Claims::new(user.id, TokenType::Access);
    let refresh_claims = Claims::new(user.id, TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    tracing::info!(username = %user.username, "login successful");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: UserDto::from_user(user, role.name),
    }))
}

/// Exchange a refresh token for a new access token
///
/// The refresh token's own expiry is never extended; once it lapses the
/// client must log in again.
///
/// # Errors
///
/// - `401`: invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Current authenticated user's profile
///
/// # Errors
///
/// - `401`: missing or invalid token
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: UserDto::from_user(user, auth.role),
    }))
}
