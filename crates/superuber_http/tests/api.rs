use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use superuber_core::db::open_db_in_memory;
use superuber_core::{PasswordScheme, VerificationPolicy};
use superuber_http::{app, AppState, Settings};
use tower::ServiceExt;

fn test_app(settings: Settings) -> Router {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO products (name, brand, description, price, stock, available_stock, id_category)
         VALUES ('lamp', 'Acme', 'desk lamp', 1999, 10, 4, 2);",
        [],
    )
    .unwrap();
    app(AppState::new(conn, settings))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(body) => send_raw(app, method, uri, Some("application/json"), &body.to_string()).await,
        None => send_raw(app, method, uri, None, "").await,
    }
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn register_then_fetch_user() {
    let app = test_app(Settings::default());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 1, "email": "a@x.com", "password": "p"}));

    let (status, body) = send(&app, Method::GET, "/api/v1/user/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "email": "a@x.com", "password": "p"}));

    let (status, body) = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["confirmed_email"], json!(false));
}

#[tokio::test]
async fn empty_fields_are_unprocessable() {
    let app = test_app(Settings::default());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "fields are empty"}));

    let (_, users) = send(&app, Method::GET, "/api/v1/users", None).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn unknown_or_malformed_user_ids_are_not_found() {
    let app = test_app(Settings::default());

    for uri in ["/api/v1/user/9", "/api/v1/user/abc"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "user not found"}));
    }
}

#[tokio::test]
async fn update_checks_existence_before_fields() {
    let app = test_app(Settings::default());

    let (status, _) = send(&app, Method::PUT, "/api/v1/users/5", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;

    let (status, _) = send(&app, Method::PUT, "/api/v1/users/1", Some(json!({"name": "Thea"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/users/1",
        Some(json!({"email": "b@x.com", "password": "q", "name": "Thea"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "b@x.com");
    assert_eq!(body["name"], "Thea");
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn unusable_bodies_answer_with_json_errors() {
    let app = test_app(Settings::default());
    let invalid = json!({"error": "invalid request body"});

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/api/v1/users",
        Some("application/json"),
        "{",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, invalid);

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/api/v1/users",
        None,
        r#"{"email":"a@x.com","password":"p"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, invalid);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/order",
        Some(json!({"id_user": "one", "id_product": 1, "order_number": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, invalid);

    let (status, body) = send_raw(&app, Method::POST, "/api/v1/authentication", None, "").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, invalid);
}

#[tokio::test]
async fn update_with_unusable_body_checks_existence_first() {
    let app = test_app(Settings::default());
    let mistyped = json!({"email": 5, "password": "p"});

    let (status, body) = send(&app, Method::PUT, "/api/v1/users/99", Some(mistyped.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "user not found"}));

    let (status, body) = send_raw(&app, Method::PUT, "/api/v1/users/99", None, "{").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "user not found"}));

    send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;

    let (status, body) = send(&app, Method::PUT, "/api/v1/users/1", Some(mistyped)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "invalid request body"}));
}

#[tokio::test]
async fn delete_acknowledges_once() {
    let app = test_app(Settings::default());
    send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id #1": " deleted"}));

    let (status, _) = send(&app, Method::DELETE, "/api/v1/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn products_are_listed_and_fetched() {
    let app = test_app(Settings::default());

    let (status, body) = send(&app, Method::GET, "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "lamp");

    let (status, body) = send(&app, Method::GET, "/api/v1/product/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_stock"], 4);
    assert_eq!(body["id_category"], 2);

    let (status, body) = send(&app, Method::GET, "/api/v1/product/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "product not found"}));
}

#[tokio::test]
async fn authentication_endpoint() {
    let app = test_app(Settings::default());
    send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/authentication",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"token": "authenticated"}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/authentication",
        Some(json!({"email": "a@x.com", "password": "P"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User and/or password is incorrect"}));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/authentication",
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn argon2_scheme_hides_raw_password() {
    let app = test_app(Settings {
        password_scheme: PasswordScheme::Argon2,
        ..Settings::default()
    });

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["password"], "p");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/authentication",
        Some(json!({"email": "a@x.com", "password": "p"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn place_order_and_verify_with_literal_policy() {
    let app = test_app(Settings::default());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/order",
        Some(json!({"idUser": 1, "idProduct": 1, "orderNumber": 5001})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"id": 1, "id_user": 1, "order_number": 5001, "id_product": 1, "fulfilled": false})
    );

    let (status, body) = send(&app, Method::POST, "/api/v1/order/verify/77", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"verify": "Verify Complete"}));

    let (status, body) = send(&app, Method::POST, "/api/v1/order/verify/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"verify": "Pending"}));
}

#[tokio::test]
async fn order_without_product_is_unprocessable() {
    let app = test_app(Settings::default());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/order",
        Some(json!({"id_user": 1, "order_number": 5001})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "fields are empty"}));
}

#[tokio::test]
async fn mark_fulfilled_policy_verifies_once_and_rejects_unknown_orders() {
    let app = test_app(Settings {
        verification_policy: VerificationPolicy::MarkFulfilled,
        ..Settings::default()
    });
    send(
        &app,
        Method::POST,
        "/api/v1/order",
        Some(json!({"id_user": 1, "id_product": 1, "order_number": 5001})),
    )
    .await;

    let (_, body) = send(&app, Method::POST, "/api/v1/order/verify/1", None).await;
    assert_eq!(body, json!({"verify": "Fulfilled"}));
    let (_, body) = send(&app, Method::POST, "/api/v1/order/verify/1", None).await;
    assert_eq!(body, json!({"verify": "Already Fulfilled"}));

    let (status, body) = send(&app, Method::POST, "/api/v1/order/verify/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "order not found"}));
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_app(Settings::default());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
