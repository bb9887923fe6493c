/// Customer model and database operations
///
/// Customers own vehicles. Deleting a customer deletes its vehicles as well
/// (`ON DELETE CASCADE` on `vehicles.customer_id`), so a vehicle row can
/// never outlive its owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     email VARCHAR(120) UNIQUE,
///     phone VARCHAR(20) NOT NULL,
///     address VARCHAR(200),
///     city VARCHAR(50),
///     state VARCHAR(50),
///     zip_code VARCHAR(10),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Customer model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID
    pub id: Uuid,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional email address, unique when present
    pub email: Option<String>,

    /// Contact phone number
    pub phone: String,

    /// Street address
    pub address: Option<String>,

    /// City
    pub city: Option<String>,

    /// State or region
    pub state: Option<String>,

    /// Postal code
    pub zip_code: Option<String>,

    /// When the customer was created
    pub created_at: DateTime<Utc>,

    /// When the customer was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new customer
///
/// First name, last name, and phone are required; the rest is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Input for updating an existing customer
///
/// Only fields that are `Some` are written. For the nullable columns the
/// inner `Option` distinguishes "set to this value" from "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<String>,
    pub address: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
}

impl UpdateCustomer {
    /// True if no field would be written
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }
}

impl Customer {
    /// Creates a new customer
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateCustomer) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (first_name, last_name, email, phone, address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, first_name, last_name, email, phone, address, city, state, zip_code,
                      created_at, updated_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.address)
        .bind(data.city)
        .bind(data.state)
        .bind(data.zip_code)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, email, phone, address, city, state, zip_code,
                   created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, email, phone, address, city, state, zip_code,
                   created_at, updated_at
            FROM customers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(customers)
    }

    /// Counts all customers
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates an existing customer
    ///
    /// Only fields present in `data` are written. `updated_at` is always
    /// refreshed. Returns the updated row, or `None` if the customer does
    /// not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCustomer,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build the SET clause from the fields that are present.
        let mut query = String::from("UPDATE customers SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.first_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", last_name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.address.is_some() {
            bind_count += 1;
            query.push_str(&format!(", address = ${}", bind_count));
        }
        if data.city.is_some() {
            bind_count += 1;
            query.push_str(&format!(", city = ${}", bind_count));
        }
        if data.state.is_some() {
            bind_count += 1;
            query.push_str(&format!(", state = ${}", bind_count));
        }
        if data.zip_code.is_some() {
            bind_count += 1;
            query.push_str(&format!(", zip_code = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, first_name, last_name, email, phone, address, \
             city, state, zip_code, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Customer>(&query).bind(id);

        if let Some(first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            q = q.bind(last_name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(address) = data.address {
            q = q.bind(address);
        }
        if let Some(city) = data.city {
            q = q.bind(city);
        }
        if let Some(state) = data.state {
            q = q.bind(state);
        }
        if let Some(zip_code) = data.zip_code {
            q = q.bind(zip_code);
        }

        let customer = q.fetch_optional(pool).await?;

        Ok(customer)
    }

    /// Deletes a customer by ID
    ///
    /// The customer's vehicles are removed by the FK cascade in the same
    /// statement. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
