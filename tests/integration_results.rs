mod common;

use axum::http::{StatusCode, header};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    TestUser, at, create_admin, create_class, create_exam, create_grade, create_lesson,
    create_parent, create_result, create_student, create_subject, create_teacher, date, send,
    send_raw, test_app,
};

struct Gradebook {
    teacher: TestUser,
    parent: TestUser,
    ana: TestUser,
    ion: TestUser,
    exam_id: Uuid,
}

/// Two students of one parent in the same class, graded on one exam.
async fn gradebook(pool: &PgPool) -> Gradebook {
    let teacher = create_teacher(pool).await;
    let parent = create_parent(pool).await;
    let grade = create_grade(pool, 5).await;
    let class = create_class(pool, grade, 30).await;
    let subject = create_subject(pool).await;
    let lesson = create_lesson(
        pool,
        teacher.id,
        class,
        subject,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let exam_id = create_exam(pool, lesson, "Fractions", at(date(2030, 9, 16), 9, 0)).await;
    let ana = create_student(pool, grade, class, parent.id).await;
    let ion = create_student(pool, grade, class, parent.id).await;
    create_result(pool, exam_id, ana.id, 90).await;
    create_result(pool, exam_id, ion.id, 55).await;

    Gradebook {
        teacher,
        parent,
        ana,
        ion,
        exam_id,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn students_see_only_their_own_results(pool: PgPool) {
    let book = gradebook(&pool).await;
    let app = test_app(pool);

    let (status, body) = send(&app, "GET", "/api/results", Some(&book.ana.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["score"], 90);
    assert_eq!(body["data"][0]["title"], "Fractions");

    let (status, body) = send(&app, "GET", "/api/results", Some(&book.parent.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn results_outside_scope_are_not_found(pool: PgPool) {
    let book = gradebook(&pool).await;
    let ion_result: Uuid = sqlx::query_scalar("SELECT id FROM results WHERE student_id = $1")
        .bind(book.ion.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let stranger = create_teacher(&pool).await;
    let app = test_app(pool);

    let uri = format!("/api/results/{}", ion_result);
    let (status, _) = send(&app, "GET", &uri, Some(&book.ana.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &uri, Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &uri, Some(&book.teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn summary_reports_average_and_pass_rate(pool: PgPool) {
    let book = gradebook(&pool).await;
    let app = test_app(pool);

    let (status, body) =
        send(&app, "GET", "/api/results/summary", Some(&book.teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["count"], 2);
    assert_eq!(body["summary"]["average"], 72.5);
    assert_eq!(body["summary"]["min"], 55);
    assert_eq!(body["summary"]["max"], 90);
    assert_eq!(body["summary"]["pass_rate"], 50);

    let uri = "/api/results/summary?title=Nothing%20like%20this";
    let (_, body) = send(&app, "GET", uri, Some(&book.teacher.token), None).await;
    assert!(body["summary"].is_null());
    assert_eq!(
        body["message"],
        "There are no grades for calculating the average."
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn teacher_cannot_grade_another_teachers_exam(pool: PgPool) {
    let book = gradebook(&pool).await;
    let stranger = create_teacher(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/results",
        Some(&stranger.token),
        Some(json!({ "score": 70, "exam_id": book.exam_id, "student_id": book.ana.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/results",
        Some(&book.teacher.token),
        Some(json!({ "score": 70, "exam_id": book.exam_id, "student_id": book.ana.id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["score"], 70);
}

#[sqlx::test(migrations = "./migrations")]
async fn exports_csv_and_pdf(pool: PgPool) {
    let book = gradebook(&pool).await;
    let admin = create_admin(&pool).await;
    let app = test_app(pool);

    let csv = send_raw(
        &app,
        "GET",
        "/api/results/export?format=csv",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(csv.status, StatusCode::OK);
    let content_type = csv.headers[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let text = String::from_utf8(csv.body.to_vec()).unwrap();
    assert_eq!(text.lines().count(), 3, "header plus two rows");
    assert!(text.contains("Fractions"));

    let pdf = send_raw(
        &app,
        "GET",
        "/api/results/export?format=pdf",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(pdf.status, StatusCode::OK);
    assert_eq!(pdf.headers[header::CONTENT_TYPE], "application/pdf");
    assert!(pdf.body.starts_with(b"%PDF-"));

    let (status, _) = send(
        &app,
        "GET",
        "/api/results/export?format=csv",
        Some(&book.ana.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
