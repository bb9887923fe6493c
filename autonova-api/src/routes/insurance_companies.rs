/// Insurance company CRUD endpoints
///
/// All endpoints require authentication; each action is checked against
/// the RBAC matrix (resource `insurance_companies`). Every role may read;
/// only managers and admins write, and only admins delete.
///
/// # Endpoints
///
/// - `GET    /api/insurance-companies` - List (paginated, `is_active` filter)
/// - `GET    /api/insurance-companies/:id` - Get one company
/// - `POST   /api/insurance-companies` - Create
/// - `PUT    /api/insurance-companies/:id` - Update
/// - `DELETE /api/insurance-companies/:id` - Delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::common::{page_count, validation_error, PageParams},
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
    models::insurance_company::{
        CreateInsuranceCompany, InsuranceCompany, UpdateInsuranceCompany,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An insurance company as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct InsuranceCompanyDto {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InsuranceCompany> for InsuranceCompanyDto {
    fn from(c: InsuranceCompany) -> Self {
        Self {
            id: c.id,
            name: c.name,
            contact_person: c.contact_person,
            phone: c.phone,
            email: c.email,
            address: c.address,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// List response
#[derive(Debug, Serialize)]
pub struct ListInsuranceCompaniesResponse {
    pub insurance_companies: Vec<InsuranceCompanyDto>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

/// Single company response
#[derive(Debug, Serialize)]
pub struct InsuranceCompanyResponse {
    pub insurance_company: InsuranceCompanyDto,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Filter parameters for the list endpoint
#[derive(Debug, Deserialize)]
pub struct InsuranceCompanyFilter {
    /// Restrict to active (true) or inactive (false) companies
    pub is_active: Option<bool>,
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInsuranceCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Contact person must be at most 100 characters"))]
    pub contact_person: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    pub is_active: Option<bool>,
}

/// Update request; only provided fields are written
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInsuranceCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Contact person must be at most 100 characters"))]
    pub contact_person: Option<String>,

    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    pub address: Option<String>,

    pub is_active: Option<bool>,
}

/// List insurance companies
pub async fn list_insurance_companies(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(page): Query<PageParams>,
    Query(filter): Query<InsuranceCompanyFilter>,
) -> ApiResult<Json<ListInsuranceCompaniesResponse>> {
    require(auth.role, Resource::InsuranceCompanies, Action::List)?;

    let total = InsuranceCompany::count(&state.db, filter.is_active).await?;
    let companies =
        InsuranceCompany::list(&state.db, filter.is_active, page.limit(), page.offset()).await?;

    Ok(Json(ListInsuranceCompaniesResponse {
        insurance_companies: companies
            .into_iter()
            .map(InsuranceCompanyDto::from)
            .collect(),
        total,
        page: page.page(),
        per_page: page.per_page(),
        pages: page_count(total, page.per_page()),
    }))
}

/// Get a specific insurance company
pub async fn get_insurance_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InsuranceCompanyResponse>> {
    require(auth.role, Resource::InsuranceCompanies, Action::View)?;

    let company = InsuranceCompany::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Insurance company not found".to_string()))?;

    Ok(Json(InsuranceCompanyResponse {
        insurance_company: InsuranceCompanyDto::from(company),
    }))
}

/// Create a new insurance company
///
/// # Errors
///
/// - `400`: validation failed
/// - `409`: name already exists
pub async fn create_insurance_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInsuranceCompanyRequest>,
) -> ApiResult<(StatusCode, Json<InsuranceCompanyResponse>)> {
    require(auth.role, Resource::InsuranceCompanies, Action::Create)?;
    req.validate().map_err(validation_error)?;

    let company = InsuranceCompany::create(
        &state.db,
        CreateInsuranceCompany {
            name: req.name,
            contact_person: req.contact_person,
            phone: req.phone,
            email: req.email,
            address: req.address,
            is_active: req.is_active,
        },
    )
    .await?;

    tracing::info!(company = %company.name, by = %auth.username, "insurance company created");

    Ok((
        StatusCode::CREATED,
        Json(InsuranceCompanyResponse {
            insurance_company: InsuranceCompanyDto::from(company),
        }),
    ))
}

/// Update an existing insurance company
pub async fn update_insurance_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateInsuranceCompanyRequest>,
) -> ApiResult<Json<InsuranceCompanyResponse>> {
    require(auth.role, Resource::InsuranceCompanies, Action::Update)?;
    req.validate().map_err(validation_error)?;

    let update = UpdateInsuranceCompany {
        name: req.name,
        contact_person: req.contact_person.map(Some),
        phone: req.phone.map(Some),
        email: req.email.map(Some),
        address: req.address.map(Some),
        is_active: req.is_active,
    };

    let company = InsuranceCompany::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Insurance company not found".to_string()))?;

    Ok(Json(InsuranceCompanyResponse {
        insurance_company: InsuranceCompanyDto::from(company),
    }))
}

/// Delete an insurance company (admin only per the matrix)
pub async fn delete_insurance_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    require(auth.role, Resource::InsuranceCompanies, Action::Delete)?;

    let deleted = InsuranceCompany::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Insurance company not found".to_string()));
    }

    tracing::info!(company_id = %id, by = %auth.username, "insurance company deleted");

    Ok(Json(DeleteResponse { deleted }))
}
