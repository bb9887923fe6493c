/// Database models for AutoNova
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `role`: The five fixed staff roles
/// - `user`: Staff accounts and authentication
/// - `customer`: Shop customers
/// - `vehicle`: Customer vehicles (VIN-tracked)
/// - `insurance_company`: Insurance companies used on repair jobs

pub mod customer;
pub mod insurance_company;
pub mod role;
pub mod user;
pub mod vehicle;
