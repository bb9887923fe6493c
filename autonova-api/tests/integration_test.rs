/// Integration tests for the AutoNova API
///
/// End-to-end coverage of the published behavior:
/// - Authentication flow (login, refresh, me, token lifecycle)
/// - The RBAC matrix as observed over HTTP
/// - Customer/vehicle CRUD with the delete cascade
/// - VIN validation and uniqueness
///
/// Requires a running PostgreSQL named by `DATABASE_URL`; every test skips
/// itself when the variable is unset.

mod common;

use autonova_shared::auth::jwt::{create_token, Claims, TokenType};
use autonova_shared::models::role::RoleName;
use autonova_shared::models::vehicle::Vehicle;
use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::{random_vin, TestContext, TEST_PASSWORD};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let Some(ctx) = TestContext::new().await else { return };

    let (status, body) = ctx.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_login_returns_tokens_and_user() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Manager).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["user"]["username"], user.username.as_str());
    assert_eq!(body["user"]["role"], "manager");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
async fn test_login_wrong_password_is_401() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Admin).await;

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": user.username, "password": "Wr0ng!Password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_inactive_account_is_403() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, token) = ctx.create_user(RoleName::Admin).await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A previously issued, still-valid token is refused too.
    let (status, _) = ctx
        .request(Method::GET, "/api/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_requires_token() {
    let Some(ctx) = TestContext::new().await else { return };

    let (status, _) = ctx.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, token) = ctx.create_user(RoleName::Technician).await;
    let (status, body) = ctx
        .request(Method::GET, "/api/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "technician");
}

#[tokio::test]
async fn test_refresh_flow() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Receptionist).await;

    let (_, login_body) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": user.username, "password": TEST_PASSWORD })),
        )
        .await;

    let refresh_token = login_body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let new_access = body["access_token"].as_str().unwrap().to_string();

    // The minted access token authenticates.
    let (status, _) = ctx
        .request(Method::GET, "/api/auth/me", Some(&new_access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, access_token) = ctx.create_user(RoleName::Admin).await;

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": access_token })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate_api_calls() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Admin).await;

    let refresh = create_token(
        &Claims::new(user.id, TokenType::Refresh),
        &ctx.config.jwt.secret,
    )
    .unwrap();

    let (status, _) = ctx
        .request(Method::GET, "/api/auth/me", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Admin).await;

    let expired = create_token(
        &Claims::with_lifetime(user.id, TokenType::Access, Duration::seconds(-3600)),
        &ctx.config.jwt.secret,
    )
    .unwrap();

    let (status, _) = ctx
        .request(Method::GET, "/api/customers", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_wrong_signature_is_rejected() {
    let Some(ctx) = TestContext::new().await else { return };
    let (user, _) = ctx.create_user(RoleName::Admin).await;

    let forged = create_token(
        &Claims::new(user.id, TokenType::Access),
        "some-other-secret-with-32-characters!",
    )
    .unwrap();

    let (status, _) = ctx
        .request(Method::GET, "/api/customers", Some(&forged), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// The RBAC matrix, observed over HTTP.
///
/// List endpoints distinguish allow (200) from deny (403); delete
/// endpoints are probed with a random ID, where passing the gate shows as
/// 404 and denial as 403.
#[tokio::test]
async fn test_rbac_matrix_over_http() {
    let Some(ctx) = TestContext::new().await else { return };

    let roles = [
        RoleName::Admin,
        RoleName::Manager,
        RoleName::Receptionist,
        RoleName::Technician,
        RoleName::Accountant,
    ];

    // (uri, may_list per role in the order above)
    let list_cases: [(&str, [bool; 5]); 3] = [
        ("/api/customers", [true, true, true, true, false]),
        ("/api/vehicles", [true, true, true, true, false]),
        ("/api/insurance-companies", [true, true, true, true, true]),
    ];

    // (uri prefix, may_delete per role in the order above)
    let delete_cases: [(&str, [bool; 5]); 3] = [
        ("/api/customers", [true, true, false, false, false]),
        ("/api/vehicles", [true, true, false, false, false]),
        ("/api/insurance-companies", [true, false, false, false, false]),
    ];

    for (i, role) in roles.iter().enumerate() {
        let (_, token) = ctx.create_user(*role).await;

        for (uri, allowed) in &list_cases {
            let (status, _) = ctx.request(Method::GET, uri, Some(&token), None).await;
            let expected = if allowed[i] {
                StatusCode::OK
            } else {
                StatusCode::FORBIDDEN
            };
            assert_eq!(status, expected, "{} listing {}", role, uri);
        }

        for (prefix, allowed) in &delete_cases {
            let uri = format!("{}/{}", prefix, Uuid::new_v4());
            let (status, _) = ctx.request(Method::DELETE, &uri, Some(&token), None).await;
            let expected = if allowed[i] {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::FORBIDDEN
            };
            assert_eq!(status, expected, "{} deleting {}", role, prefix);
        }
    }
}

#[tokio::test]
async fn test_technician_may_update_vehicles_but_not_customers() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Technician).await;

    // Passing the gate on a random ID yields 404, not 403.
    let (status, _) = ctx
        .request(
            Method::PUT,
            &format!("/api/vehicles/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "mileage": 120000 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .request(
            Method::PUT,
            &format!("/api/customers/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "phone": "555-0100" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/vehicles",
            Some(&token),
            Some(json!({
                "customer_id": Uuid::new_v4(),
                "make": "Toyota",
                "model": "Camry",
                "year": 2020
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_delete_cascades_to_vehicles() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Admin).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/customers",
            Some(&token),
            Some(json!({ "first_name": "Cascade", "last_name": "Case", "phone": "555-0101" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();

    let mut vehicle_ids = Vec::new();
    for _ in 0..3 {
        let (status, body) = ctx
            .request(
                Method::POST,
                "/api/vehicles",
                Some(&token),
                Some(json!({
                    "customer_id": customer_id,
                    "make": "Honda",
                    "model": "Civic",
                    "year": 2019,
                    "vin": random_vin()
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "body: {}", body);
        vehicle_ids.push(body["vehicle"]["id"].as_str().unwrap().to_string());
    }

    let (status, _) = ctx
        .request(
            Method::DELETE,
            &format!("/api/customers/{}", customer_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // All three vehicle rows are gone.
    for id in vehicle_ids {
        let vehicle = Vehicle::find_by_id(&ctx.db, id.parse().unwrap()).await.unwrap();
        assert!(vehicle.is_none(), "vehicle {} survived the cascade", id);
    }
}

#[tokio::test]
async fn test_duplicate_vin_is_conflict() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Manager).await;

    let (_, body) = ctx
        .request(
            Method::POST,
            "/api/customers",
            Some(&token),
            Some(json!({ "first_name": "Vin", "last_name": "Holder", "phone": "555-0102" })),
        )
        .await;
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();

    let vin = random_vin();
    let vehicle = |v: &str| {
        json!({
            "customer_id": customer_id,
            "make": "Ford",
            "model": "Focus",
            "year": 2018,
            "vin": v
        })
    };

    let (status, _) = ctx
        .request(Method::POST, "/api/vehicles", Some(&token), Some(vehicle(&vin)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request(Method::POST, "/api/vehicles", Some(&token), Some(vehicle(&vin)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // Cleanup (cascades the created vehicle).
    ctx.request(
        Method::DELETE,
        &format!("/api/customers/{}", customer_id),
        Some(&token),
        None,
    )
    .await;
}

#[tokio::test]
async fn test_invalid_vin_is_validation_error() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Admin).await;

    let (_, body) = ctx
        .request(
            Method::POST,
            "/api/customers",
            Some(&token),
            Some(json!({ "first_name": "Bad", "last_name": "Vin", "phone": "555-0103" })),
        )
        .await;
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/vehicles",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "make": "Mazda",
                "model": "3",
                "year": 2021,
                "vin": "1HGCM82633A12345O"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    ctx.request(
        Method::DELETE,
        &format!("/api/customers/{}", customer_id),
        Some(&token),
        None,
    )
    .await;
}

#[tokio::test]
async fn test_vehicle_create_with_missing_customer_is_404() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Admin).await;

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/vehicles",
            Some(&token),
            Some(json!({
                "customer_id": Uuid::new_v4(),
                "make": "Kia",
                "model": "Rio",
                "year": 2022
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_customer_email_is_conflict() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Admin).await;

    let email = format!("dup-{}@example.com", Uuid::new_v4().simple());
    let customer = json!({
        "first_name": "Dup", "last_name": "Email",
        "phone": "555-0104", "email": email
    });

    let (status, body) = ctx
        .request(Method::POST, "/api/customers", Some(&token), Some(customer.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .request(Method::POST, "/api/customers", Some(&token), Some(customer))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.request(
        Method::DELETE,
        &format!("/api/customers/{}", customer_id),
        Some(&token),
        None,
    )
    .await;
}

#[tokio::test]
async fn test_pagination_defaults_and_clamping() {
    let Some(ctx) = TestContext::new().await else { return };
    let (_, token) = ctx.create_user(RoleName::Admin).await;

    let (status, body) = ctx
        .request(Method::GET, "/api/customers", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 20);

    let (_, body) = ctx
        .request(
            Method::GET,
            "/api/customers?page=2&per_page=5000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 100);
}

/// The end-to-end scenario from the published behavior: login as admin,
/// create John Doe, register his car, read it back with the vehicles
/// embedded.
#[tokio::test]
async fn test_admin_creates_customer_and_vehicle_scenario() {
    let Some(ctx) = TestContext::new().await else { return };
    let (admin, _) = ctx.create_user(RoleName::Admin).await;

    const SCENARIO_VIN: &str = "1HGCM82633A123456";

    // The VIN is unique; clear leftovers from earlier runs.
    if let Some(existing) = Vehicle::find_by_vin(&ctx.db, SCENARIO_VIN).await.unwrap() {
        Vehicle::delete(&ctx.db, existing.id).await.unwrap();
    }

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": admin.username, "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/customers",
            Some(&token),
            Some(json!({ "first_name": "John", "last_name": "Doe", "phone": "555-0105" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/vehicles",
            Some(&token),
            Some(json!({
                "customer_id": customer_id,
                "make": "Honda",
                "model": "Accord",
                "year": 2003,
                "vin": SCENARIO_VIN
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx
        .request(
            Method::GET,
            &format!("/api/customers/{}?include_vehicles=true", customer_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let vehicles = body["customer"]["vehicles"].as_array().unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["vin"], SCENARIO_VIN);

    // Without the flag the vehicles key is absent entirely.
    let (_, body) = ctx
        .request(
            Method::GET,
            &format!("/api/customers/{}", customer_id),
            Some(&token),
            None,
        )
        .await;
    assert!(body["customer"].get("vehicles").is_none());

    ctx.request(
        Method::DELETE,
        &format!("/api/customers/{}", customer_id),
        Some(&token),
        None,
    )
    .await;
}
