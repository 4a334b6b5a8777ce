#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, Utc, Weekday};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use barbershop_backend::config::ShopConfig;
use barbershop_backend::db::NewAppointment;

/// Single-connection in-memory database with the full schema applied
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

pub fn shop_config() -> ShopConfig {
    ShopConfig {
        weekday_open_min: 8 * 60,
        weekday_close_min: 19 * 60,
        saturday_open_min: 8 * 60,
        saturday_close_min: 16 * 60,
        closed_weekday: Weekday::Sun,
        slot_minutes: 30,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A reference clock well before the test dates (Sunday June 1st, 2025)
pub fn clock() -> NaiveDateTime {
    date(2025, 6, 1).and_hms_opt(7, 0, 0).unwrap()
}

pub async fn seed_barber(pool: &SqlitePool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query("INSERT INTO barbers (id, name, active, created_at, updated_at) VALUES ($1, $2, 1, $3, $3)")
        .bind(id)
        .bind(name)
        .bind(now)
        .execute(pool)
        .await
        .expect("failed to seed barber");
    id
}

pub async fn seed_customer(pool: &SqlitePool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query("INSERT INTO customers (id, name, email, created_at, updated_at) VALUES ($1, $2, $3, $4, $4)")
        .bind(id)
        .bind(name)
        .bind(format!("{name}@example.com"))
        .bind(now)
        .execute(pool)
        .await
        .expect("failed to seed customer");
    id
}

pub async fn seed_service(pool: &SqlitePool, name: &str, duration_minutes: i64) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query("INSERT INTO services (id, name, duration_minutes, price_cents, active, created_at, updated_at) VALUES ($1, $2, $3, 2500, 1, $4, $4)")
        .bind(id)
        .bind(name)
        .bind(duration_minutes)
        .bind(now)
        .execute(pool)
        .await
        .expect("failed to seed service");
    id
}

pub fn booking_payload(
    customer_id: Uuid,
    barber_id: Option<Uuid>,
    service_ids: Vec<Uuid>,
    date: NaiveDate,
    start: &str,
) -> NewAppointment {
    NewAppointment {
        customer_id,
        barber_id,
        service_ids,
        date,
        start: start.to_string(),
        end: None,
        notes: None,
    }
}
