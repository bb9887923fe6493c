/// Customer CRUD endpoints
///
/// All endpoints require authentication; each action is checked against
/// the RBAC matrix (resource `customers`).
///
/// # Endpoints
///
/// - `GET    /api/customers` - List customers (paginated)
/// - `GET    /api/customers/:id` - Get a customer, optionally with vehicles
/// - `POST   /api/customers` - Create a customer
/// - `PUT    /api/customers/:id` - Update a customer
/// - `DELETE /api/customers/:id` - Delete a customer (cascades to vehicles)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::common::{page_count, validation_error, PageParams},
    routes::vehicles::VehicleDto,
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
        customer::{CreateCustomer, Customer, UpdateCustomer},
        vehicle::Vehicle,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A customer as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Present only when the client asked for `include_vehicles=true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<Vec<VehicleDto>>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
            address: c.address,
            city: c.city,
            state: c.state,
            zip_code: c.zip_code,
            created_at: c.created_at,
            updated_at: c.updated_at,
            vehicles: None,
        }
    }
}

impl CustomerDto {
    fn with_vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.vehicles = Some(vehicles.into_iter().map(VehicleDto::from).collect());
        self
    }
}

/// List customers response
#[derive(Debug, Serialize)]
pub struct ListCustomersResponse {
    pub customers: Vec<CustomerDto>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

/// Single customer response
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub customer: CustomerDto,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Query parameters for `GET /api/customers/:id`
#[derive(Debug, Deserialize)]
pub struct GetCustomerParams {
    /// Embed the customer's vehicles in the response
    #[serde(default)]
    pub include_vehicles: bool,
}

/// Create customer request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: String,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 50, message = "State must be at most 50 characters"))]
    pub state: Option<String>,

    #[validate(length(max = 10, message = "Zip code must be at most 10 characters"))]
    pub zip_code: Option<String>,
}

/// Update customer request; only provided fields are written
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 50, message = "State must be at most 50 characters"))]
    pub state: Option<String>,

    #[validate(length(max = 10, message = "Zip code must be at most 10 characters"))]
    pub zip_code: Option<String>,
}

/// List customers with pagination
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<ListCustomersResponse>> {
    require(auth.role, Resource::Customers, Action::List)?;

    let total = Customer::count(&state.db).await?;
    let customers = Customer::list(&state.db, page.limit(), page.offset()).await?;

    Ok(Json(ListCustomersResponse {
        customers: customers.into_iter().map(CustomerDto::from).collect(),
        total,
        page: page.page(),
        per_page: page.per_page(),
        pages: page_count(total, page.per_page()),
    }))
}

/// Get a specific customer
///
/// With `?include_vehicles=true` the response embeds the customer's
/// vehicles.
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Query(params): Query<GetCustomerParams>,
) -> ApiResult<Json<CustomerResponse>> {
    require(auth.role, Resource::Customers, Action::View)?;

    let customer = Customer::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let mut dto = CustomerDto::from(customer);
    if params.include_vehicles {
        let vehicles = Vehicle::list_by_customer(&state.db, id).await?;
        dto = dto.with_vehicles(vehicles);
    }

    Ok(Json(CustomerResponse { customer: dto }))
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    require(auth.role, Resource::Customers, Action::Create)?;
    req.validate().map_err(validation_error)?;

    let customer = Customer::create(
        &state.db,
        CreateCustomer {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            city: req.city,
            state: req.state,
            zip_code: req.zip_code,
        },
    )
    .await?;

    tracing::info!(customer_id = %customer.id, by = %auth.username, "customer created");

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            customer: CustomerDto::from(customer),
        }),
    ))
}

/// Update an existing customer
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    require(auth.role, Resource::Customers, Action::Update)?;
    req.validate().map_err(validation_error)?;

    let update = UpdateCustomer {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email.map(Some),
        phone: req.phone,
        address: req.address.map(Some),
        city: req.city.map(Some),
        state: req.state.map(Some),
        zip_code: req.zip_code.map(Some),
    };

    let customer = Customer::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    Ok(Json(CustomerResponse {
        customer: CustomerDto::from(customer),
    }))
}

/// Delete a customer
///
/// The customer's vehicles are removed in the same statement by the FK
/// cascade.
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require(auth.role, Resource::Customers, Action::Delete)?;

    let deleted = Customer::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    tracing::info!(customer_id = %id, by = %auth.username, "customer deleted");

    Ok(Json(DeleteResponse { deleted }))
}
