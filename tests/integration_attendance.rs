mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    TestUser, at, create_admin, create_class, create_grade, create_lesson, create_parent,
    create_student, create_subject, create_teacher, date, send, test_app,
};

struct Register {
    admin: TestUser,
    teacher: TestUser,
    other_teacher: TestUser,
    student: TestUser,
    parent: TestUser,
    classmate: TestUser,
    lesson: Uuid,
    other_lesson: Uuid,
}

async fn register(pool: &PgPool) -> Register {
    let admin = create_admin(pool).await;
    let teacher = create_teacher(pool).await;
    let other_teacher = create_teacher(pool).await;
    let grade = create_grade(pool, 4).await;
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
    let other_lesson = create_lesson(
        pool,
        other_teacher.id,
        class,
        subject,
        at(date(2030, 9, 16), 10, 0),
        at(date(2030, 9, 16), 10, 50),
    )
    .await;
    let parent = create_parent(pool).await;
    let student = create_student(pool, grade, class, parent.id).await;
    let other_parent = create_parent(pool).await;
    let classmate = create_student(pool, grade, class, other_parent.id).await;

    Register {
        admin,
        teacher,
        other_teacher,
        student,
        parent,
        classmate,
        lesson,
        other_lesson,
    }
}

fn mark(student: Uuid, lesson: Uuid, present: bool, excused: bool) -> serde_json::Value {
    json!({
        "date": "2030-09-16",
        "present": present,
        "excused": excused,
        "student_id": student,
        "lesson_id": lesson,
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_record_attendance_for_their_own_lessons(pool: PgPool) {
    let r = register(&pool).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.teacher.token),
        Some(mark(r.student.id, r.lesson, true, true)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["present"], true);
    assert_eq!(body["excused"], false, "presence cannot be excused");

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.teacher.token),
        Some(mark(r.student.id, r.other_lesson, false, false)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.student.token),
        Some(mark(r.student.id, r.lesson, true, false)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn attendance_is_scoped_by_role(pool: PgPool) {
    let r = register(&pool).await;
    let app = test_app(pool);

    let (_, own) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.teacher.token),
        Some(mark(r.student.id, r.lesson, true, false)),
    )
    .await;
    let (_, classmate) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.other_teacher.token),
        Some(mark(r.classmate.id, r.other_lesson, false, true)),
    )
    .await;
    assert_eq!(classmate["excused"], true);

    let cases = [
        (&r.admin.token, 2),
        (&r.teacher.token, 1),
        (&r.other_teacher.token, 1),
        (&r.student.token, 1),
        (&r.parent.token, 1),
        (&r.classmate.token, 1),
    ];
    for (token, expected) in cases {
        let (status, body) = send(&app, "GET", "/api/attendance", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], expected);
    }

    let (_, body) = send(&app, "GET", "/api/attendance", Some(&r.parent.token), None).await;
    assert_eq!(body["data"][0]["id"], own["id"]);

    let foreign = format!("/api/attendance/{}", classmate["id"].as_str().unwrap());
    let (status, _) = send(&app, "GET", &foreign, Some(&r.student.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &foreign, Some(&r.teacher.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "GET",
        "/api/attendance?from=2030-09-17",
        Some(&r.admin.token),
        None,
    )
    .await;
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn marking_present_clears_the_excuse(pool: PgPool) {
    let r = register(&pool).await;
    let app = test_app(pool);

    let (_, record) = send(
        &app,
        "POST",
        "/api/attendance",
        Some(&r.teacher.token),
        Some(mark(r.student.id, r.lesson, false, true)),
    )
    .await;
    assert_eq!(record["excused"], true);

    let uri = format!("/api/attendance/{}", record["id"].as_str().unwrap());
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&r.teacher.token),
        Some(json!({ "present": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["present"], true);
    assert_eq!(body["excused"], false);
}
