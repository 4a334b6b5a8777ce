mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Datelike, Duration, Local, Weekday};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use barbershop_backend::app::create_router;
use barbershop_backend::app_state::AppState;
use barbershop_backend::config::{AppConfig, Config, DatabaseConfig, Environment, ServerConfig};

use common::{seed_barber, seed_customer, seed_service, setup_pool, shop_config};

async fn test_app() -> (axum::Router, sqlx::SqlitePool) {
    let pool = setup_pool().await;
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(1),
            min_connections: Some(1),
        },
        shop: shop_config(),
        app: AppConfig {
            name: "Barbershop Backend".to_string(),
            environment: Environment::Development,
        },
    };
    let state = AppState::new(pool.clone(), config);
    (create_router(state), pool)
}

/// A bookable date at least a week out, skipping the closing day
fn future_open_date() -> chrono::NaiveDate {
    let mut date = Local::now().date_naive() + Duration::days(7);
    while date.weekday() == Weekday::Sun {
        date = date + Duration::days(1);
    }
    date
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_reports_database_status() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["database"], "healthy");
}

#[tokio::test]
async fn availability_endpoint_returns_ordered_slots() {
    let (app, pool) = test_app().await;
    let barber = seed_barber(&pool, "Alice").await;
    let date = future_open_date();

    let uri = format!("/availability?barber_id={barber}&date={date}&duration_minutes=30");
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let slots = body["slots"].as_array().unwrap();
    assert!(!slots.is_empty());
    assert_eq!(slots[0], "08:00");
}

#[tokio::test]
async fn availability_endpoint_requires_duration() {
    let (app, _pool) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/availability?date=2025-06-02")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_roundtrip_over_http() {
    let (app, pool) = test_app().await;
    let barber = seed_barber(&pool, "Alice").await;
    let customer = seed_customer(&pool, "carlos").await;
    let cut = seed_service(&pool, "Haircut", 30).await;
    let date = future_open_date();

    let payload = json!({
        "customer_id": customer,
        "barber_id": barber,
        "service_ids": [cut],
        "date": date.to_string(),
        "start": "09:00",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/appointments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["start"], "09:00");
    assert_eq!(body["end"], "09:30");
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_str().unwrap().to_string();

    // The created appointment is readable and carries its services
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/appointments/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["services"].as_array().unwrap().len(), 1);

    // Cancel it as its owner
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/appointments/{id}/cancel"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "customer_id": customer }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second cancellation is a 404, not a second transition
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/appointments/{id}/cancel"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "customer_id": customer }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_validation_errors_map_to_400() {
    let (app, pool) = test_app().await;
    let barber = seed_barber(&pool, "Alice").await;
    let customer = seed_customer(&pool, "carlos").await;
    let date = future_open_date();

    let payload = json!({
        "customer_id": customer,
        "barber_id": barber,
        "service_ids": [],
        "date": date.to_string(),
        "start": "09:00",
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/appointments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Validation error");
}

#[tokio::test]
async fn double_booking_over_http_maps_to_409() {
    let (app, pool) = test_app().await;
    let barber = seed_barber(&pool, "Alice").await;
    let customer = seed_customer(&pool, "carlos").await;
    let cut = seed_service(&pool, "Haircut", 30).await;
    let date = future_open_date();

    let payload = json!({
        "customer_id": customer,
        "barber_id": barber,
        "service_ids": [cut],
        "date": date.to_string(),
        "start": "09:00",
    });
    let request = |payload: &Value| {
        Request::builder()
            .method("POST")
            .uri("/appointments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    };

    let first = app.clone().oneshot(request(&payload)).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.oneshot(request(&payload)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn blackout_crud_over_http() {
    let (app, pool) = test_app().await;
    let barber = seed_barber(&pool, "Alice").await;
    let date = future_open_date();

    let payload = json!({
        "barber_id": barber,
        "kind": "time_window",
        "date_start": date.to_string(),
        "time_start": "12:00",
        "time_end": "13:00",
        "reason": "lunch",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blackouts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "time_window");
    assert_eq!(body["time_start"], "12:00");
    let id = body["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/blackouts?barber_id={barber}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/blackouts/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/blackouts/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
