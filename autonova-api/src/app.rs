/// Application state and router builder
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                        # public
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register         # public
///     │   ├── POST /login            # public
///     │   ├── POST /refresh          # public (takes a refresh token)
///     │   └── GET  /me               # authenticated
///     ├── /customers                 # authenticated + RBAC per action
///     ├── /vehicles                  # authenticated + RBAC per action
///     └── /insurance-companies       # authenticated + RBAC per action
/// ```
///
/// The auth layer only authenticates (token → user → role); the per-action
/// permission checks live in the handlers against the RBAC matrix.

use crate::{config::Config, error::ApiError, middleware::security::security_headers};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::get,
    Router,
};
use autonova_shared::auth::middleware::{authenticate, AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; `Arc` keeps the clone
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;
    use axum::routing::post;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth endpoints.
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Authenticated auth endpoints.
    let auth_private = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let customer_routes = Router::new()
        .route(
            "/",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route(
            "/:id",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let vehicle_routes = Router::new()
        .route(
            "/",
            get(routes::vehicles::list_vehicles).post(routes::vehicles::create_vehicle),
        )
        .route(
            "/:id",
            get(routes::vehicles::get_vehicle)
                .put(routes::vehicles::update_vehicle)
                .delete(routes::vehicles::delete_vehicle),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let insurance_routes = Router::new()
        .route(
            "/",
            get(routes::insurance_companies::list_insurance_companies)
                .post(routes::insurance_companies::create_insurance_company),
        )
        .route(
            "/:id",
            get(routes::insurance_companies::get_insurance_company)
                .put(routes::insurance_companies::update_insurance_company)
                .delete(routes::insurance_companies::delete_insurance_company),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_private))
        .nest("/customers", customer_routes)
        .nest("/vehicles", vehicle_routes)
        .nest("/insurance-companies", insurance_routes);

    let cors = build_cors(&state.config);
    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn(move |req, next| {
            security_headers(production, req, next)
        }))
        .with_state(state)
}

/// Configures CORS from the origin list
///
/// A lone "*" gives the permissive development setup; anything else is an
/// explicit allow list.
fn build_cors(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Authentication middleware layer
///
/// Validates the Bearer access token, loads the user's role and active
/// flag, and injects an `AuthContext` into request extensions. Inactive
/// accounts are rejected here with 403 no matter which route they hit.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(&state.db, state.jwt_secret(), req.headers()).await?;

    tracing::debug!(user = %auth.username, role = %auth.role, "authenticated request");

    req.extensions_mut().insert::<AuthContext>(auth);

    Ok(next.run(req).await)
}
