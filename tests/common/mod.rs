#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use scholaris::router::init_router;
use scholaris::state::AppState;
use scholaris_auth::{Role, create_access_token};
use scholaris_config::JwtConfig;
use scholaris_core::hash_password;

pub const PASSWORD: &str = "password123";

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

pub fn test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    init_router(AppState::with_pool(pool))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

fn unique_username(prefix: &str) -> String {
    format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..10])
}

async fn insert_user(pool: &PgPool, role: Role) -> TestUser {
    let username = unique_username(&role.as_str()[..1]);
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(hash_password(PASSWORD).unwrap())
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id, &username, role, &JwtConfig::from_env()).unwrap();
    TestUser {
        id,
        username,
        token,
    }
}

pub async fn create_admin(pool: &PgPool) -> TestUser {
    insert_user(pool, Role::Admin).await
}

pub async fn create_teacher(pool: &PgPool) -> TestUser {
    let user = insert_user(pool, Role::Teacher).await;
    sqlx::query(
        r#"INSERT INTO teachers (id, name, surname, address, blood_type, gender, birthday)
           VALUES ($1, 'Maria', $2, 'Str. Lunga 1', 'A+', 'FEMALE', '1985-03-02')"#,
    )
    .bind(user.id)
    .bind(&user.username)
    .execute(pool)
    .await
    .unwrap();
    user
}

pub async fn create_parent(pool: &PgPool) -> TestUser {
    let user = insert_user(pool, Role::Parent).await;
    sqlx::query(
        r#"INSERT INTO parents (id, name, surname, phone, address)
           VALUES ($1, 'Elena', 'Ionescu', $2, 'Str. Mare 2')"#,
    )
    .bind(user.id)
    .bind(&user.username)
    .execute(pool)
    .await
    .unwrap();
    user
}

pub async fn create_grade(pool: &PgPool, level: i32) -> Uuid {
    sqlx::query_scalar("INSERT INTO grades (level) VALUES ($1) RETURNING id")
        .bind(level)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_class(pool: &PgPool, grade_id: Uuid, capacity: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO classes (name, capacity, grade_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(unique_username("class"))
    .bind(capacity)
    .bind(grade_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_student(
    pool: &PgPool,
    grade_id: Uuid,
    class_id: Uuid,
    parent_id: Uuid,
) -> TestUser {
    let user = insert_user(pool, Role::Student).await;
    sqlx::query(
        r#"INSERT INTO students (id, name, surname, address, blood_type, gender, birthday,
                                   grade_id, class_id, parent_id)
           VALUES ($1, 'Ion', $2, 'Str. Mica 3', 'O+', 'MALE', '2014-05-20', $3, $4, $5)"#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(grade_id)
    .bind(class_id)
    .bind(parent_id)
    .execute(pool)
    .await
    .unwrap();
    user
}

pub async fn create_subject(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO subjects (name) VALUES ($1) RETURNING id")
        .bind(unique_username("subject"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_module(pool: &PgPool, start: NaiveDate, end: NaiveDate) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO academic_modules (name, start_date, end_date)
           VALUES ($1, $2, $3)
           RETURNING id"#,
    )
    .bind(unique_username("module"))
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_holiday(pool: &PgPool, module_id: Uuid, day: NaiveDate) {
    sqlx::query("INSERT INTO holidays (module_id, name, date) VALUES ($1, 'Holiday', $2)")
        .bind(module_id)
        .bind(day)
        .execute(pool)
        .await
        .unwrap();
}

/// Inserts a lesson directly, bypassing availability checks.
pub async fn create_lesson(
    pool: &PgPool,
    teacher_id: Uuid,
    class_id: Uuid,
    subject_id: Uuid,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Uuid {
    let day = start.format("%A").to_string().to_uppercase();
    sqlx::query_scalar(
        r#"INSERT INTO lessons (name, day, start_time, end_time, subject_id, class_id, teacher_id)
           VALUES ('Lesson', $1::lesson_day, $2, $3, $4, $5, $6)
           RETURNING id"#,
    )
    .bind(day)
    .bind(start)
    .bind(end)
    .bind(subject_id)
    .bind(class_id)
    .bind(teacher_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_exam(
    pool: &PgPool,
    lesson_id: Uuid,
    title: &str,
    start: NaiveDateTime,
) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO exams (title, start_time, end_time, lesson_id)
           VALUES ($1, $2, $2 + INTERVAL '1 hour', $3)
           RETURNING id"#,
    )
    .bind(title)
    .bind(start)
    .bind(lesson_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_result(pool: &PgPool, exam_id: Uuid, student_id: Uuid, score: i32) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO results (score, exam_id, student_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(score)
    .bind(exam_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn send_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> RawResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    RawResponse {
        status,
        headers,
        body,
    }
}

pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, token, body).await;
    let json = response.json();
    (response.status, json)
}
