use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, Money, ProductNew, UserNew};
use migration::MigratorTrait;
use server::{ServerState, router};

const PASSWORD: &str = "password";

async fn app() -> (Router, Arc<Engine>) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    engine.create_ledger_company("Acme").await.unwrap();
    engine
        .create_user(UserNew::new("alice", "alice@example.com", PASSWORD))
        .await
        .unwrap();
    engine
        .create_user(UserNew::new("manager", "manager@example.com", PASSWORD).staff())
        .await
        .unwrap();
    engine
        .create_user(UserNew::new("admin", "admin@example.com", PASSWORD).staff())
        .await
        .unwrap();

    let engine = Arc::new(engine);
    let state = ServerState {
        engine: engine.clone(),
    };
    (router(state), engine)
}

fn basic(username: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{PASSWORD}"));
    format!("Basic {token}")
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    username: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(username) = username {
        request = request.header(header::AUTHORIZATION, basic(username));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn widget(engine: &Engine) -> i32 {
    engine
        .create_product(ProductNew::new("Widget", 10, Money::new(5_00)))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn missing_credentials_are_unauthorized() {
    let (app, _engine) = app().await;

    let (status, _) = call(&app, Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _engine) = app().await;

    let token = base64::engine::general_purpose::STANDARD.encode("alice:wrong");
    let request = Request::builder()
        .uri("/products")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn sale_lifecycle_over_http() {
    let (app, engine) = app().await;
    let product_id = widget(&engine).await;

    let (status, sale) = call(
        &app,
        Method::POST,
        "/sales",
        Some("alice"),
        Some(json!({ "product": product_id, "quantity_sold": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["unit_price_minor"], 500);

    let (_, product) = call(
        &app,
        Method::GET,
        &format!("/products/{product_id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(product["quantity"], 7);
    assert_eq!(engine.ledger_company().await.unwrap().total_revenue, Money::new(15_00));

    let (status, body) = call(
        &app,
        Method::POST,
        "/sales",
        Some("alice"),
        Some(json!({ "product": product_id, "quantity_sold": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Insufficient stock"));
    assert_eq!(engine.product(product_id).await.unwrap().quantity, 7);

    let sale_id = sale["id"].as_i64().unwrap();
    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/sales/{sale_id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(engine.product(product_id).await.unwrap().quantity, 10);
    assert_eq!(engine.ledger_company().await.unwrap().total_revenue, Money::ZERO);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/sales/{sale_id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn companies_require_staff() {
    let (app, _engine) = app().await;

    let (status, body) = call(&app, Method::GET, "/companies", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "You do not have permission to perform this action."
    );

    let (status, body) = call(&app, Method::GET, "/companies", Some("manager"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["company_name"], "Acme");
}

#[tokio::test]
async fn financials_are_pinned_to_the_admin_user() {
    let (app, _engine) = app().await;

    let (status, _) = call(&app, Method::GET, "/company-financials", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        call(&app, Method::GET, "/company-financials", Some("manager"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/company-financials", Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 1, "total_revenue_minor": 0 }]));

    let (status, body) =
        call(&app, Method::GET, "/company-financials/1", Some("admin"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_revenue_minor"], 0);
}

#[tokio::test]
async fn users_never_expose_passwords() {
    let (app, _engine) = app().await;

    let (status, user) = call(
        &app,
        Method::POST,
        "/users",
        Some("alice"),
        Some(json!({ "username": "carol", "email": "carol@example.com", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());
    assert_eq!(user["is_staff"], false);

    let (status, users) = call(&app, Method::GET, "/users?search=carol", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn products_list_rejects_unknown_ordering() {
    let (app, engine) = app().await;
    widget(&engine).await;

    let (status, body) =
        call(&app, Method::GET, "/products?ordering=-name", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Widget");

    let (status, _) =
        call(&app, Method::GET, "/products?ordering=price", Some("alice"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_patch_is_a_bad_request() {
    let (app, engine) = app().await;
    let product_id = widget(&engine).await;

    let (status, _) = call(
        &app,
        Method::PATCH,
        &format!("/products/{product_id}"),
        Some("alice"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
