/// Vehicle CRUD endpoints
///
/// All endpoints require authentication; each action is checked against
/// the RBAC matrix (resource `vehicles`). VINs are validated before any
/// write and stored uppercase; a duplicate VIN is a 409.
///
/// # Endpoints
///
/// - `GET    /api/vehicles` - List vehicles (paginated, `customer_id` filter)
/// - `GET    /api/vehicles/:id` - Get a vehicle, optionally with its owner
/// - `POST   /api/vehicles` - Create a vehicle
/// - `PUT    /api/vehicles/:id` - Update a vehicle
/// - `DELETE /api/vehicles/:id` - Delete a vehicle

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, FieldError},
    routes::common::{page_count, validation_error, PageParams},
    routes::customers::CustomerDto,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use autonova_shared::{
    auth::{
        authorization::{require, Action, Resource},
        middleware::AuthContext,
    },
    models::{
        customer::Customer,
        vehicle::{validate_vin, CreateVehicle, UpdateVehicle, Vehicle},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A vehicle as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub mileage: Option<i32>,
    pub engine_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Present only when the client asked for `include_owner=true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerDto>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            customer_id: v.customer_id,
            make: v.make,
            model: v.model,
            year: v.year,
            color: v.color,
            vin: v.vin,
            license_plate: v.license_plate,
            mileage: v.mileage,
            engine_type: v.engine_type,
            created_at: v.created_at,
            updated_at: v.updated_at,
            customer: None,
        }
    }
}

/// List vehicles response
#[derive(Debug, Serialize)]
pub struct ListVehiclesResponse {
    pub vehicles: Vec<VehicleDto>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

/// Single vehicle response
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub vehicle: VehicleDto,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Filter parameters for `GET /api/vehicles`
#[derive(Debug, Deserialize)]
pub struct VehicleFilter {
    /// Restrict to one customer's vehicles
    pub customer_id: Option<Uuid>,
}

/// Query parameters for `GET /api/vehicles/:id`
#[derive(Debug, Deserialize)]
pub struct GetVehicleParams {
    /// Embed the owning customer in the response
    #[serde(default)]
    pub include_owner: bool,
}

/// Create vehicle request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub customer_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: String,

    pub year: i32,

    #[validate(length(max = 30, message = "Color must be at most 30 characters"))]
    pub color: Option<String>,

    /// Optional VIN; validated separately (17 chars, no I/O/Q)
    pub vin: Option<String>,

    #[validate(length(max = 15, message = "License plate must be at most 15 characters"))]
    pub license_plate: Option<String>,

    pub mileage: Option<i32>,

    #[validate(length(max = 30, message = "Engine type must be at most 30 characters"))]
    pub engine_type: Option<String>,
}

/// Update vehicle request; only provided fields are written
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    /// Transfer the vehicle to another customer
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,

    pub year: Option<i32>,

    #[validate(length(max = 30, message = "Color must be at most 30 characters"))]
    pub color: Option<String>,

    pub vin: Option<String>,

    #[validate(length(max = 15, message = "License plate must be at most 15 characters"))]
    pub license_plate: Option<String>,

    pub mileage: Option<i32>,

    #[validate(length(max = 30, message = "Engine type must be at most 30 characters"))]
    pub engine_type: Option<String>,
}

/// Checks and normalizes an optional VIN from a request
///
/// Empty strings are treated as absent; valid VINs come back uppercased.
fn normalize_vin(vin: Option<String>) -> Result<Option<String>, ApiError> {
    match vin {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) => {
            validate_vin(&v)
                .map_err(|reason| ApiError::Validation(vec![FieldError::new("vin", reason)]))?;
            Ok(Some(v.to_ascii_uppercase()))
        }
    }
}

/// List vehicles with pagination and optional `customer_id` filter
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(page): Query<PageParams>,
    Query(filter): Query<VehicleFilter>,
) -> ApiResult<Json<ListVehiclesResponse>> {
    require(auth.role, Resource::Vehicles, Action::List)?;

    let total = Vehicle::count(&state.db, filter.customer_id).await?;
    let vehicles = Vehicle::list(&state.db, filter.customer_id, page.limit(), page.offset()).await?;

    Ok(Json(ListVehiclesResponse {
        vehicles: vehicles.into_iter().map(VehicleDto::from).collect(),
        total,
        page: page.page(),
        per_page: page.per_page(),
        pages: page_count(total, page.per_page()),
    }))
}

/// Get a specific vehicle
///
/// With `?include_owner=true` the response embeds the owning customer.
pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Query(params): Query<GetVehicleParams>,
) -> ApiResult<Json<VehicleResponse>> {
    require(auth.role, Resource::Vehicles, Action::View)?;

    let vehicle = Vehicle::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let mut dto = VehicleDto::from(vehicle);
    if params.include_owner {
        let owner = Customer::find_by_id(&state.db, dto.customer_id).await?;
        dto.customer = owner.map(CustomerDto::from);
    }

    Ok(Json(VehicleResponse { vehicle: dto }))
}

/// Create a new vehicle
///
/// # Errors
///
/// - `400`: validation failed (including a malformed VIN)
/// - `404`: the referenced customer does not exist
/// - `409`: VIN already exists
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<VehicleResponse>)> {
    require(auth.role, Resource::Vehicles, Action::Create)?;
    req.validate().map_err(validation_error)?;

    let vin = normalize_vin(req.vin)?;

    Customer::find_by_id(&state.db, req.customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let vehicle = Vehicle::create(
        &state.db,
        CreateVehicle {
            customer_id: req.customer_id,
            make: req.make,
            model: req.model,
            year: req.year,
            color: req.color,
            vin,
            license_plate: req.license_plate,
            mileage: req.mileage,
            engine_type: req.engine_type,
        },
    )
    .await?;

    tracing::info!(vehicle_id = %vehicle.id, by = %auth.username, "vehicle created");

    Ok((
        StatusCode::CREATED,
        Json(VehicleResponse {
            vehicle: VehicleDto::from(vehicle),
        }),
    ))
}

/// Update an existing vehicle
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateVehicleRequest>,
) -> ApiResult<Json<VehicleResponse>> {
    require(auth.role, Resource::Vehicles, Action::Update)?;
    req.validate().map_err(validation_error)?;

    let vin = normalize_vin(req.vin)?;

    if let Some(customer_id) = req.customer_id {
        Customer::find_by_id(&state.db, customer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;
    }

    let update = UpdateVehicle {
        customer_id: req.customer_id,
        make: req.make,
        model: req.model,
        year: req.year,
        color: req.color.map(Some),
        vin,
        license_plate: req.license_plate.map(Some),
        mileage: req.mileage.map(Some),
        engine_type: req.engine_type.map(Some),
    };

    let vehicle = Vehicle::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    Ok(Json(VehicleResponse {
        vehicle: VehicleDto::from(vehicle),
    }))
}

/// Delete a vehicle
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require(auth.role, Resource::Vehicles, Action::Delete)?;

    let deleted = Vehicle::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Vehicle not found".to_string()));
    }

    tracing::info!(vehicle_id = %id, by = %auth.username, "vehicle deleted");

    Ok(Json(DeleteResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vin_passthrough() {
        assert_eq!(normalize_vin(None).unwrap(), None);
        assert_eq!(normalize_vin(Some(String::new())).unwrap(), None);
    }

    #[test]
    fn test_normalize_vin_uppercases() {
        let vin = normalize_vin(Some("1hgcm82633a123456".to_string())).unwrap();
        assert_eq!(vin.as_deref(), Some("1HGCM82633A123456"));
    }

    #[test]
    fn test_normalize_vin_rejects_bad_vin() {
        let err = normalize_vin(Some("TOO-SHORT".to_string())).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
