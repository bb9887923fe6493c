/// Role model and the fixed role set
///
/// AutoNova uses exactly five staff roles. The `roles` table holds them as
/// reference data (seeded by migration); what each role may do is decided
/// entirely by the permission table in [`crate::auth::authorization`].
///
/// # Schema
///
/// ```sql
/// CREATE TYPE role_name AS ENUM ('admin', 'manager', 'receptionist', 'technician', 'accountant');
///
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name role_name NOT NULL UNIQUE,
///     description VARCHAR(200),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// The five fixed staff roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Full access to everything
    Admin,

    /// Full access to customers and vehicles, manages insurance companies
    Manager,

    /// Front desk: creates and updates records, never deletes
    Receptionist,

    /// Works on vehicles: read access plus vehicle updates
    Technician,

    /// Financial staff; currently read-only on insurance companies
    Accountant,
}

impl RoleName {
    /// All roles, in privilege order
    pub const ALL: [RoleName; 5] = [
        RoleName::Admin,
        RoleName::Manager,
        RoleName::Receptionist,
        RoleName::Technician,
        RoleName::Accountant,
    ];

    /// Role name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Manager => "manager",
            RoleName::Receptionist => "receptionist",
            RoleName::Technician => "technician",
            RoleName::Accountant => "accountant",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `roles` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Role name (unique, one of the five fixed values)
    pub name: RoleName,

    /// Human-readable description
    pub description: Option<String>,

    /// When the role row was created
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Finds a role by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, created_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Finds a role by name
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use autonova_shared::models::role::{Role, RoleName};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let admin = Role::find_by_name(&pool, RoleName::Admin).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_name(pool: &PgPool, name: RoleName) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, created_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Lists all roles
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, created_at
            FROM roles
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_as_str() {
        assert_eq!(RoleName::Admin.as_str(), "admin");
        assert_eq!(RoleName::Manager.as_str(), "manager");
        assert_eq!(RoleName::Receptionist.as_str(), "receptionist");
        assert_eq!(RoleName::Technician.as_str(), "technician");
        assert_eq!(RoleName::Accountant.as_str(), "accountant");
    }

    #[test]
    fn test_role_name_serde_lowercase() {
        let json = serde_json::to_string(&RoleName::Receptionist).unwrap();
        assert_eq!(json, "\"receptionist\"");

        let parsed: RoleName = serde_json::from_str("\"technician\"").unwrap();
        assert_eq!(parsed, RoleName::Technician);
    }

    #[test]
    fn test_all_contains_five_distinct_roles() {
        let mut names: Vec<&str> = RoleName::ALL.iter().map(|r| r.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
