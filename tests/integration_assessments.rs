mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    TestUser, at, create_admin, create_class, create_exam, create_grade, create_lesson,
    create_parent, create_student, create_subject, create_teacher, date, send, test_app,
};

struct School {
    admin: TestUser,
    teacher: TestUser,
    other_teacher: TestUser,
    student: TestUser,
    parent: TestUser,
    outsider: TestUser,
    lesson: Uuid,
}

async fn school(pool: &PgPool) -> School {
    let admin = create_admin(pool).await;
    let teacher = create_teacher(pool).await;
    let other_teacher = create_teacher(pool).await;
    let grade = create_grade(pool, 9).await;
    let class = create_class(pool, grade, 30).await;
    let other_class = create_class(pool, grade, 30).await;
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
    let parent = create_parent(pool).await;
    let student = create_student(pool, grade, class, parent.id).await;
    let outsider = create_student(pool, grade, other_class, parent.id).await;

    School {
        admin,
        teacher,
        other_teacher,
        student,
        parent,
        outsider,
        lesson,
    }
}

fn exam_body(lesson: Uuid, start: &str, end: &str) -> serde_json::Value {
    json!({
        "title": "Algebra test",
        "start_time": start,
        "end_time": end,
        "lesson_id": lesson,
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn exams_belong_to_the_lesson_teacher(pool: PgPool) {
    let s = school(&pool).await;
    let app = test_app(pool);

    let body = exam_body(s.lesson, "2030-10-01T09:00:00", "2030-10-01T10:00:00");
    let (status, _) =
        send(&app, "POST", "/api/exams", Some(&s.other_teacher.token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        send(&app, "POST", "/api/exams", Some(&s.student.token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, exam) =
        send(&app, "POST", "/api/exams", Some(&s.teacher.token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(exam["teacher_id"], json!(s.teacher.id));

    let uri = format!("/api/exams/{}", exam["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, Some(&s.other_teacher.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&s.teacher.token),
        Some(json!({ "title": "Geometry test" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Geometry test");
}

#[sqlx::test(migrations = "./migrations")]
async fn exam_times_are_validated(pool: PgPool) {
    let s = school(&pool).await;
    let app = test_app(pool);

    let cases = [
        ("2020-10-01T09:00:00", "2020-10-01T10:00:00"),
        ("2030-10-01T10:00:00", "2030-10-01T09:00:00"),
    ];
    for (start, end) in cases {
        let (status, _) = send(
            &app,
            "POST",
            "/api/exams",
            Some(&s.admin.token),
            Some(exam_body(s.lesson, start, end)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} - {}", start, end);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn exams_are_visible_to_the_lesson_class(pool: PgPool) {
    let s = school(&pool).await;
    let exam = create_exam(&pool, s.lesson, "Final", at(date(2030, 10, 1), 9, 0)).await;
    let app = test_app(pool);

    for (token, expected) in [
        (&s.admin.token, 1),
        (&s.teacher.token, 1),
        (&s.student.token, 1),
        (&s.parent.token, 1),
        (&s.other_teacher.token, 0),
        (&s.outsider.token, 0),
    ] {
        let (status, body) = send(&app, "GET", "/api/exams", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], expected);
    }

    let uri = format!("/api/exams/{}", exam);
    let (status, _) = send(&app, "GET", &uri, Some(&s.outsider.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "GET", &uri, Some(&s.student.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Final");
}

#[sqlx::test(migrations = "./migrations")]
async fn assignments_follow_the_same_rules(pool: PgPool) {
    let s = school(&pool).await;
    let app = test_app(pool);

    let assignment = |start: &str, due: &str| {
        json!({
            "title": "Essay",
            "start_date": start,
            "due_date": due,
            "lesson_id": s.lesson,
        })
    };

    let (status, _) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&s.teacher.token),
        Some(assignment("2020-10-01T00:00:00", "2020-10-08T00:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&s.teacher.token),
        Some(assignment("2030-10-08T00:00:00", "2030-10-01T00:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&s.other_teacher.token),
        Some(assignment("2030-10-01T00:00:00", "2030-10-08T00:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        "POST",
        "/api/assignments",
        Some(&s.teacher.token),
        Some(assignment("2030-10-01T00:00:00", "2030-10-08T00:00:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/assignments", Some(&s.parent.token), None).await;
    assert_eq!(body["meta"]["total"], 1);
    let (_, body) = send(&app, "GET", "/api/assignments", Some(&s.outsider.token), None).await;
    assert_eq!(body["meta"]["total"], 0);

    let uri = format!("/api/assignments/{}", created["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, Some(&s.student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &uri, Some(&s.teacher.token), None).await;
    assert_eq!(status, StatusCode::OK);
}
