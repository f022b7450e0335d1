mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{PASSWORD, create_admin, create_parent, create_teacher, send, test_app};

#[sqlx::test(migrations = "./migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": teacher.username, "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "teacher");
    assert_eq!(body["user"]["username"], teacher.username.as_str());

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = send(&app, "GET", "/api/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], teacher.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": admin.username, "password": "not-the-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_user_gets_same_error_as_wrong_password(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = test_app(pool);

    let (_, wrong_password) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": admin.username, "password": "nope-nope" })),
    )
    .await;
    let (status, unknown) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "nope-nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown["error"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn protected_routes_need_a_token(pool: PgPool) {
    let app = test_app(pool);

    let (status, _) = send(&app, "GET", "/api/exams", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/exams", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn parents_cannot_reach_staff_routes(pool: PgPool) {
    let parent = create_parent(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(&app, "GET", "/api/teachers", Some(&parent.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/grades", Some(&parent.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_cannot_create_grades(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/grades",
        Some(&teacher.token),
        Some(json!({ "level": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
