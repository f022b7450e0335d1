mod common;

use axum::http::{StatusCode, header};
use serde_json::json;
use sqlx::PgPool;

use common::{
    at, create_admin, create_class, create_exam, create_grade, create_lesson, create_parent,
    create_result, create_student, create_subject, create_teacher, date, send, send_raw, test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn certificate_is_a_pdf_download(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 5).await;
    let class = create_class(&pool, grade, 30).await;
    let student = create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool);

    let response = send_raw(
        &app,
        "POST",
        &format!("/api/documents/students/{}/certificate", student.id),
        Some(&admin.token),
        Some(json!({
            "number": "125",
            "purpose": "Bus pass",
            "school_year_start": 2025,
            "school_year_end": 2026,
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"certificate-"));
    assert!(response.body.starts_with(b"%PDF-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn transcript_uses_recorded_results(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let teacher = create_teacher(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 5).await;
    let class = create_class(&pool, grade, 30).await;
    let subject = create_subject(&pool).await;
    let lesson = create_lesson(
        &pool,
        teacher.id,
        class,
        subject,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let exam = create_exam(&pool, lesson, "Test 1", at(date(2030, 9, 16), 9, 0)).await;
    let student = create_student(&pool, grade, class, parent.id).await;
    create_result(&pool, exam, student.id, 80).await;
    let app = test_app(pool);

    let response = send_raw(
        &app,
        "POST",
        &format!("/api/documents/students/{}/transcript", student.id),
        Some(&admin.token),
        Some(json!({
            "cif": "RO123456",
            "personal_code": "5140520123456",
            "nationality": "Romanian",
            "birth_place": "Cluj",
            "father_name": "Vasile",
            "mother_name": "Elena",
            "parents_address": "Str. Mare 2",
            "from": "2030-09-01",
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with(b"%PDF-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn absence_report_validates_month(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 5).await;
    let class = create_class(&pool, grade, 30).await;
    let student = create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool);
    let uri = format!("/api/documents/students/{}/absence-report", student.id);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&admin.token),
        Some(json!({ "month": "October" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = send_raw(
        &app,
        "POST",
        &uri,
        Some(&admin.token),
        Some(json!({ "month": "2030-10" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.starts_with(b"%PDF-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn documents_are_admin_only(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 5).await;
    let class = create_class(&pool, grade, 30).await;
    let student = create_student(&pool, grade, class, parent.id).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/documents/students/{}/absence-report", student.id),
        Some(&teacher.token),
        Some(json!({ "month": "2030-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_student_is_not_found(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/documents/students/{}/absence-report", uuid::Uuid::new_v4()),
        Some(&admin.token),
        Some(json!({ "month": "2030-10" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
