/// Insurance company model and database operations
///
/// Insurance companies are referenced on repair jobs. Names are unique;
/// companies are switched inactive rather than deleted in day-to-day use,
/// but hard delete exists for admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Insurance company model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InsuranceCompany {
    pub id: Uuid,

    /// Company name, unique
    pub name: String,

    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,

    /// Inactive companies stay listable but should not be attached to new jobs
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new insurance company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInsuranceCompany {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for updating an existing insurance company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInsuranceCompany {
    pub name: Option<String>,
    pub contact_person: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateInsuranceCompany {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_person.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.is_active.is_none()
    }
}

impl InsuranceCompany {
    /// Creates a new insurance company
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists.
    pub async fn create(pool: &PgPool, data: CreateInsuranceCompany) -> Result<Self, sqlx::Error> {
        let company = sqlx::query_as::<_, InsuranceCompany>(
            r#"
            INSERT INTO insurance_companies (name, contact_person, phone, email, address, is_active)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
            RETURNING id, name, contact_person, phone, email, address, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.contact_person)
        .bind(data.phone)
        .bind(data.email)
        .bind(data.address)
        .bind(data.is_active)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    /// Finds an insurance company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, InsuranceCompany>(
            r#"
            SELECT id, name, contact_person, phone, email, address, is_active,
                   created_at, updated_at
            FROM insurance_companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Finds an insurance company by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, InsuranceCompany>(
            r#"
            SELECT id, name, contact_person, phone, email, address, is_active,
                   created_at, updated_at
            FROM insurance_companies
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Lists insurance companies with pagination, optionally filtered by active flag
    pub async fn list(
        pool: &PgPool,
        is_active: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let companies = sqlx::query_as::<_, InsuranceCompany>(
            r#"
            SELECT id, name, contact_person, phone, email, address, is_active,
                   created_at, updated_at
            FROM insurance_companies
            WHERE ($1::boolean IS NULL OR is_active = $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(is_active)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(companies)
    }

    /// Counts insurance companies, optionally filtered by active flag
    pub async fn count(pool: &PgPool, is_active: Option<bool>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM insurance_companies WHERE ($1::boolean IS NULL OR is_active = $1)",
        )
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates an existing insurance company
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateInsuranceCompany,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE insurance_companies SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.contact_person.is_some() {
            bind_count += 1;
            query.push_str(&format!(", contact_person = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.address.is_some() {
            bind_count += 1;
            query.push_str(&format!(", address = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, contact_person, phone, email, address, \
             is_active, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, InsuranceCompany>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(contact_person) = data.contact_person {
            q = q.bind(contact_person);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(address) = data.address {
            q = q.bind(address);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let company = q.fetch_optional(pool).await?;

        Ok(company)
    }

    /// Deletes an insurance company by ID, returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM insurance_companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
