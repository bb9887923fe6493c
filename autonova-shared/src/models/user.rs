/// User model and database operations
///
/// Staff accounts. Every user carries exactly one role via `role_id`;
/// the role decides what the user may do (see [`crate::auth::authorization`]).
/// Users are deactivated with `is_active`, never hard-deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(80) NOT NULL UNIQUE,
///     email VARCHAR(120) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     phone VARCHAR(20),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     role_id UUID NOT NULL REFERENCES roles(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use autonova_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, role_id: Uuid) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "jdoe".to_string(),
///         email: "jdoe@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         first_name: "John".to_string(),
///         last_name: "Doe".to_string(),
///         phone: None,
///         role_id,
///     },
/// )
/// .await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::role::RoleName;

/// User model representing a staff account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Whether the account may log in; inactive accounts are rejected with 403
    pub is_active: bool,

    /// Role assignment (FK to `roles`)
    pub role_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Role assignment
    pub role_id: Uuid,
}

/// User row joined with its role name
///
/// This is what the auth middleware works with: everything needed to build
/// an `AuthContext` in a single query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithRole {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Whether the account may authenticate
    pub is_active: bool,

    /// Role name resolved via the `roles` join
    pub role: RoleName,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the role does not exist (FK violation).
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, phone, role_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, first_name, last_name, phone,
                      is_active, role_id, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.phone)
        .bind(data.role_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, phone,
                   is_active, role_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// This is the login lookup.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, phone,
                   is_active, role_id, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, phone,
                   is_active, role_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Fetches the fields the auth middleware needs, role included, in one query
    pub async fn find_with_role(pool: &PgPool, id: Uuid) -> Result<Option<UserWithRole>, sqlx::Error> {
        let user = sqlx::query_as::<_, UserWithRole>(
            r#"
            SELECT u.id, u.username, u.is_active, r.name AS role
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Resolves the user's role name
    pub async fn role_name(pool: &PgPool, id: Uuid) -> Result<Option<RoleName>, sqlx::Error> {
        let role: Option<RoleName> = sqlx::query_scalar(
            r#"
            SELECT r.name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create = CreateUser {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            phone: Some("555-0100".to_string()),
            role_id: Uuid::new_v4(),
        };

        assert_eq!(create.username, "jdoe");
        assert_eq!(create.phone.as_deref(), Some("555-0100"));
    }

    // Database round-trips are covered by the API integration tests.
}
