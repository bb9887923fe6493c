/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, me)
/// - `customers`: Customer CRUD
/// - `vehicles`: Vehicle CRUD
/// - `insurance_companies`: Insurance company CRUD
/// - `common`: Pagination and validation helpers shared by the above

pub mod auth;
pub mod common;
pub mod customers;
pub mod health;
pub mod insurance_companies;
pub mod vehicles;
