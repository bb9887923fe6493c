/// Vehicle model and database operations
///
/// Every vehicle belongs to exactly one customer (`customer_id` is NOT
/// NULL). The VIN is optional but unique when present, and must be 17
/// alphanumeric characters excluding I, O, and Q; it is stored uppercase.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE vehicles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
///     make VARCHAR(50) NOT NULL,
///     model VARCHAR(50) NOT NULL,
///     year INTEGER NOT NULL,
///     color VARCHAR(30),
///     vin VARCHAR(17) UNIQUE,
///     license_plate VARCHAR(15),
///     mileage INTEGER,
///     engine_type VARCHAR(30),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Characters banned from VINs because they read like 1 and 0
const VIN_EXCLUDED: [char; 3] = ['I', 'O', 'Q'];

/// Validates a Vehicle Identification Number
///
/// A VIN is exactly 17 ASCII alphanumeric characters and never contains
/// I, O, or Q (in either case). Returns a human-readable reason on failure.
///
/// # Example
///
/// ```
/// use autonova_shared::models::vehicle::validate_vin;
///
/// assert!(validate_vin("1HGCM82633A123456").is_ok());
/// assert!(validate_vin("1HGCM82633A12345").is_err());  // 16 chars
/// assert!(validate_vin("1HGCM82633A12345O").is_err()); // contains O
/// ```
pub fn validate_vin(vin: &str) -> Result<(), String> {
    if vin.len() != 17 {
        return Err(format!("VIN must be exactly 17 characters, got {}", vin.len()));
    }

    for c in vin.chars() {
        if !c.is_ascii_alphanumeric() {
            return Err(format!("VIN contains invalid character '{}'", c));
        }
        if VIN_EXCLUDED.contains(&c.to_ascii_uppercase()) {
            return Err(format!("VIN may not contain the letter '{}'", c.to_ascii_uppercase()));
        }
    }

    Ok(())
}

/// Vehicle model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    /// Unique vehicle ID
    pub id: Uuid,

    /// Owning customer (FK, never null)
    pub customer_id: Uuid,

    /// Manufacturer, e.g. Toyota
    pub make: String,

    /// Model, e.g. Camry
    pub model: String,

    /// Model year
    pub year: i32,

    /// Paint color
    pub color: Option<String>,

    /// Vehicle Identification Number, unique when present, stored uppercase
    pub vin: Option<String>,

    /// License plate
    pub license_plate: Option<String>,

    /// Odometer reading
    pub mileage: Option<i32>,

    /// Engine type, e.g. petrol, diesel, electric
    pub engine_type: Option<String>,

    /// When the vehicle was created
    pub created_at: DateTime<Utc>,

    /// When the vehicle was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new vehicle
///
/// Callers must have validated the VIN (see [`validate_vin`]) and verified
/// the customer exists before calling; the database still enforces both
/// uniqueness and the FK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicle {
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub engine_type: Option<String>,
}

/// Input for updating an existing vehicle
///
/// Only fields that are `Some` are written. The VIN can be set but not
/// cleared; ownership transfers by providing a new `customer_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicle {
    pub customer_id: Option<Uuid>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<Option<String>>,
    pub vin: Option<String>,
    pub license_plate: Option<Option<String>>,
    pub mileage: Option<Option<i32>>,
    pub engine_type: Option<Option<String>>,
}

impl UpdateVehicle {
    /// True if no field would be written
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.color.is_none()
            && self.vin.is_none()
            && self.license_plate.is_none()
            && self.mileage.is_none()
            && self.engine_type.is_none()
    }
}

impl Vehicle {
    /// Creates a new vehicle
    ///
    /// # Errors
    ///
    /// Returns an error if the VIN already exists (unique constraint
    /// violation) or the customer does not exist (FK violation).
    pub async fn create(pool: &PgPool, data: CreateVehicle) -> Result<Self, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (customer_id, make, model, year, color, vin, license_plate, mileage, engine_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, customer_id, make, model, year, color, vin, license_plate, mileage,
                      engine_type, created_at, updated_at
            "#,
        )
        .bind(data.customer_id)
        .bind(data.make)
        .bind(data.model)
        .bind(data.year)
        .bind(data.color)
        .bind(data.vin)
        .bind(data.license_plate)
        .bind(data.mileage)
        .bind(data.engine_type)
        .fetch_one(pool)
        .await?;

        Ok(vehicle)
    }

    /// Finds a vehicle by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, customer_id, make, model, year, color, vin, license_plate, mileage,
                   engine_type, created_at, updated_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Finds a vehicle by VIN
    pub async fn find_by_vin(pool: &PgPool, vin: &str) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, customer_id, make, model, year, color, vin, license_plate, mileage,
                   engine_type, created_at, updated_at
            FROM vehicles
            WHERE vin = $1
            "#,
        )
        .bind(vin)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Lists vehicles with pagination, optionally filtered by owner
    pub async fn list(
        pool: &PgPool,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, customer_id, make, model, year, color, vin, license_plate, mileage,
                   engine_type, created_at, updated_at
            FROM vehicles
            WHERE ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(vehicles)
    }

    /// Counts vehicles, optionally filtered by owner
    pub async fn count(pool: &PgPool, customer_id: Option<Uuid>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vehicles WHERE ($1::uuid IS NULL OR customer_id = $1)",
        )
        .bind(customer_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists every vehicle owned by a customer, oldest first
    pub async fn list_by_customer(pool: &PgPool, customer_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, customer_id, make, model, year, color, vin, license_plate, mileage,
                   engine_type, created_at, updated_at
            FROM vehicles
            WHERE customer_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(pool)
        .await?;

        Ok(vehicles)
    }

    /// Updates an existing vehicle
    ///
    /// Only fields present in `data` are written. Returns the updated row,
    /// or `None` if the vehicle does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateVehicle,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query = String::from("UPDATE vehicles SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.customer_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", customer_id = ${}", bind_count));
        }
        if data.make.is_some() {
            bind_count += 1;
            query.push_str(&format!(", make = ${}", bind_count));
        }
        if data.model.is_some() {
            bind_count += 1;
            query.push_str(&format!(", model = ${}", bind_count));
        }
        if data.year.is_some() {
            bind_count += 1;
            query.push_str(&format!(", year = ${}", bind_count));
        }
        if data.color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color = ${}", bind_count));
        }
        if data.vin.is_some() {
            bind_count += 1;
            query.push_str(&format!(", vin = ${}", bind_count));
        }
        if data.license_plate.is_some() {
            bind_count += 1;
            query.push_str(&format!(", license_plate = ${}", bind_count));
        }
        if data.mileage.is_some() {
            bind_count += 1;
            query.push_str(&format!(", mileage = ${}", bind_count));
        }
        if data.engine_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", engine_type = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, customer_id, make, model, year, color, vin, \
             license_plate, mileage, engine_type, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Vehicle>(&query).bind(id);

        if let Some(customer_id) = data.customer_id {
            q = q.bind(customer_id);
        }
        if let Some(make) = data.make {
            q = q.bind(make);
        }
        if let Some(model) = data.model {
            q = q.bind(model);
        }
        if let Some(year) = data.year {
            q = q.bind(year);
        }
        if let Some(color) = data.color {
            q = q.bind(color);
        }
        if let Some(vin) = data.vin {
            q = q.bind(vin);
        }
        if let Some(license_plate) = data.license_plate {
            q = q.bind(license_plate);
        }
        if let Some(mileage) = data.mileage {
            q = q.bind(mileage);
        }
        if let Some(engine_type) = data.engine_type {
            q = q.bind(engine_type);
        }

        let vehicle = q.fetch_optional(pool).await?;

        Ok(vehicle)
    }

    /// Deletes a vehicle by ID, returns true if a row was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
