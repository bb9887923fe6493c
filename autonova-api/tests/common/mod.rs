/// Common test utilities for integration tests
///
/// Provides a `TestContext` that connects to the database named by
/// `DATABASE_URL`, runs migrations, and builds the router. When
/// `DATABASE_URL` is not set, `TestContext::new()` returns `None` and the
/// calling test skips itself, so the suite stays green on machines without
/// a Postgres.

use autonova_api::app::{build_router, AppState};
use autonova_api::config::{ApiConfig, Config, DatabaseSettings, JwtConfig};
use autonova_shared::auth::jwt::{create_token, Claims, TokenType};
use autonova_shared::auth::password::hash_password;
use autonova_shared::models::role::{Role, RoleName};
use autonova_shared::models::user::{CreateUser, User};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt as _;
use uuid::Uuid;

/// The password every test user is created with
pub const TEST_PASSWORD: &str = "Str0ng!Passw0rd";

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context: database, router, and config
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    password_hash: String,
}

impl TestContext {
    /// Builds a test context, or `None` when `DATABASE_URL` is not set
    pub async fn new() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        };

        let db = PgPool::connect(&url)
            .await
            .expect("failed to connect to test database");

        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("failed to run migrations");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseSettings {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        // One hash shared by every test user; hashing is deliberately slow.
        let password_hash = hash_password(TEST_PASSWORD).expect("failed to hash test password");

        Some(Self {
            db,
            app,
            config,
            password_hash,
        })
    }

    /// Creates a user with the given role and returns it with an access token
    pub async fn create_user(&self, role: RoleName) -> (User, String) {
        let role_row = Role::find_by_name(&self.db, role)
            .await
            .expect("role query failed")
            .expect("role not seeded");

        let suffix = Uuid::new_v4().simple().to_string();
        let user = User::create(
            &self.db,
            CreateUser {
                username: format!("test-{}-{}", role.as_str(), &suffix[..12]),
                email: format!("test-{}@example.com", &suffix[..12]),
                password_hash: self.password_hash.clone(),
                first_name: "Test".to_string(),
                last_name: role.as_str().to_string(),
                phone: None,
                role_id: role_row.id,
            },
        )
        .await
        .expect("failed to create test user");

        let token = self.access_token_for(user.id);
        (user, token)
    }

    /// Mints an access token for a user ID
    pub fn access_token_for(&self, user_id: Uuid) -> String {
        create_token(&Claims::new(user_id, TokenType::Access), &self.config.jwt.secret)
            .expect("failed to create token")
    }

    /// Sends a request through the router and returns status + JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}

/// A random syntactically valid VIN (hex never contains I, O, or Q)
pub fn random_vin() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
    hex[..17].to_string()
}
