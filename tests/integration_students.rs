mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    at, create_admin, create_class, create_grade, create_lesson, create_parent, create_student,
    create_subject, create_teacher, date, send, test_app,
};

fn student_body(username: &str, grade_id: Uuid, class_id: Uuid, parent_id: Uuid) -> Value {
    json!({
        "username": username,
        "password": "student-pass",
        "name": "Ana",
        "surname": "Pop",
        "address": "Str. Noua 4",
        "blood_type": "AB+",
        "gender": "FEMALE",
        "birthday": "2014-02-11",
        "grade_id": grade_id,
        "class_id": class_id,
        "parent_id": parent_id,
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn admin_creates_student_with_account(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 3).await;
    let class = create_class(&pool, grade, 25).await;
    let app = test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(&admin.token),
        Some(student_body("ana.pop", grade, class, parent.id)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ana.pop");
    assert_eq!(body["grade_level"], 3);
    assert_eq!(body["parent_name"], "Elena Ionescu");

    let role: String =
        sqlx::query_scalar("SELECT role::text FROM users WHERE username = 'ana.pop'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn full_class_rejects_enrolment(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 4).await;
    let class = create_class(&pool, grade, 1).await;
    create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(&admin.token),
        Some(student_body("late.comer", grade, class, parent.id)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Class is at full capacity");

    let accounts: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'late.comer'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0, "the account is rolled back with the profile");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_conflicts(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 2).await;
    let class = create_class(&pool, grade, 25).await;
    let app = test_app(pool);

    let body = student_body("same.name", grade, class, parent.id);
    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(&admin.token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/api/students", Some(&admin.token), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_read_but_do_not_write(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 6).await;
    let class = create_class(&pool, grade, 25).await;
    let student = create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/students/{}", student.id),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class_id"], class.to_string());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/students/{}", student.id),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_teacher(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let teacher = create_teacher(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 7).await;
    let taught = create_class(&pool, grade, 25).await;
    let other = create_class(&pool, grade, 25).await;
    let subject = create_subject(&pool).await;
    create_lesson(
        &pool,
        teacher.id,
        taught,
        subject,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let mine = create_student(&pool, grade, taught, parent.id).await;
    create_student(&pool, grade, other, parent.id).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/students?teacher_id={}", teacher.id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], mine.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn class_capacity_cannot_drop_below_enrolment(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 8).await;
    let class = create_class(&pool, grade, 5).await;
    create_student(&pool, grade, class, parent.id).await;
    create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/classes/{}", class),
        Some(&admin.token),
        Some(json!({ "capacity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Capacity cannot be lower than the 2 enrolled students");
}
