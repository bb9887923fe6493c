/// Database layer for AutoNova
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: sqlx migration runner (migrations live at the workspace root)

pub mod migrations;
pub mod pool;
