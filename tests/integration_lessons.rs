mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    at, create_admin, create_class, create_grade, create_holiday, create_lesson, create_module,
    create_parent, create_student, create_subject, create_teacher, date, send, test_app,
};

struct Timetable {
    teacher_id: Uuid,
    class_id: Uuid,
    subject_id: Uuid,
}

async fn timetable(pool: &PgPool) -> (Timetable, String) {
    let teacher = create_teacher(pool).await;
    let grade = create_grade(pool, 5).await;
    let class_id = create_class(pool, grade, 30).await;
    let subject_id = create_subject(pool).await;
    (
        Timetable {
            teacher_id: teacher.id,
            class_id,
            subject_id,
        },
        teacher.token,
    )
}

fn lesson_body(t: &Timetable, start: &str, end: &str) -> serde_json::Value {
    json!({
        "name": "Mathematics",
        "day": "MONDAY",
        "start_time": start,
        "end_time": end,
        "subject_id": t.subject_id,
        "class_id": t.class_id,
        "teacher_id": t.teacher_id,
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn overlapping_lesson_is_rejected(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let app = test_app(pool);

    let (status, lesson) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&admin.token),
        Some(lesson_body(&t, "2030-09-16T09:00:00", "2030-09-16T09:50:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lesson["day"], "MONDAY");

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&admin.token),
        Some(lesson_body(&t, "2030-09-16T09:30:00", "2030-09-16T10:20:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Teacher is not available in this time slot");
}

#[sqlx::test(migrations = "./migrations")]
async fn back_to_back_lessons_are_allowed(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let app = test_app(pool);

    for (start, end) in [
        ("2030-09-16T09:00:00", "2030-09-16T09:50:00"),
        ("2030-09-16T09:50:00", "2030-09-16T10:40:00"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/lessons",
            Some(&admin.token),
            Some(lesson_body(&t, start, end)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn lessons_outside_teaching_hours_are_rejected(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&admin.token),
        Some(lesson_body(&t, "2030-09-16T07:00:00", "2030-09-16T07:50:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // 2030-09-17 is a Tuesday
    let (status, _) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&admin.token),
        Some(lesson_body(&t, "2030-09-17T09:00:00", "2030-09-17T09:50:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn teachers_only_schedule_themselves(pool: PgPool) {
    let (t, own_token) = timetable(&pool).await;
    let other = create_teacher(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&other.token),
        Some(lesson_body(&t, "2030-09-16T09:00:00", "2030-09-16T09:50:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/lessons",
        Some(&own_token),
        Some(lesson_body(&t, "2030-09-16T09:00:00", "2030-09-16T09:50:00")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn recurring_lessons_skip_holidays(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let module_id = create_module(&pool, date(2030, 9, 16), date(2030, 10, 6)).await;
    create_holiday(&pool, module_id, date(2030, 9, 23)).await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons/recurring",
        Some(&admin.token),
        Some(json!({
            "name": "Mathematics",
            "day": "MONDAY",
            "start_time": "09:00",
            "end_time": "09:50",
            "subject_id": t.subject_id,
            "class_id": t.class_id,
            "teacher_id": t.teacher_id,
            "module_id": module_id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 2);
    assert_eq!(body["created"], 2);
    let names: Vec<&str> = body["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mathematics - 16.09.2030", "Mathematics - 30.09.2030"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn recurring_lessons_report_every_conflicting_date(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let module_id = create_module(&pool, date(2030, 9, 16), date(2030, 10, 6)).await;
    create_lesson(
        &pool,
        t.teacher_id,
        t.class_id,
        t.subject_id,
        at(date(2030, 9, 23), 9, 30),
        at(date(2030, 9, 23), 10, 20),
    )
    .await;
    let app = test_app(pool.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/lessons/recurring",
        Some(&admin.token),
        Some(json!({
            "name": "Mathematics",
            "day": "MONDAY",
            "start_time": "09:00",
            "end_time": "09:50",
            "subject_id": t.subject_id,
            "class_id": t.class_id,
            "teacher_id": t.teacher_id,
            "module_id": module_id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().ends_with("on: 23.09.2030"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "nothing is inserted when any date conflicts");
}

#[sqlx::test(migrations = "./migrations")]
async fn availability_lists_conflicts(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let lesson_id = create_lesson(
        &pool,
        t.teacher_id,
        t.class_id,
        t.subject_id,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let app = test_app(pool);

    let base = format!(
        "/api/lessons/availability?teacher_id={}&day=MONDAY&start_time=09:20&end_time=10:00",
        t.teacher_id
    );
    let (status, body) = send(&app, "GET", &base, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["conflicts"][0]["id"], lesson_id.to_string());

    let uri = format!("{}&exclude_lesson_id={}", base, lesson_id);
    let (_, body) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(body["available"], true);

    let uri = format!("{}&date=2030-09-23", base);
    let (_, body) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(body["available"], true, "another Monday is free");
}

#[sqlx::test(migrations = "./migrations")]
async fn moving_a_lesson_ignores_itself(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let (t, _) = timetable(&pool).await;
    let lesson_id = create_lesson(
        &pool,
        t.teacher_id,
        t.class_id,
        t.subject_id,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let app = test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/lessons/{}", lesson_id),
        Some(&admin.token),
        Some(json!({
            "start_time": "2030-09-16T09:10:00",
            "end_time": "2030-09-16T10:00:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["start_time"], "2030-09-16T09:10:00");
}

#[sqlx::test(migrations = "./migrations")]
async fn students_and_parents_see_their_class_timetable(pool: PgPool) {
    let (t, teacher_token) = timetable(&pool).await;
    let grade = create_grade(&pool, 6).await;
    let other_class = create_class(&pool, grade, 30).await;
    let parent = create_parent(&pool).await;
    let student = create_student(&pool, grade, t.class_id, parent.id).await;

    let own = create_lesson(
        &pool,
        t.teacher_id,
        t.class_id,
        t.subject_id,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let other = create_lesson(
        &pool,
        t.teacher_id,
        other_class,
        t.subject_id,
        at(date(2030, 9, 16), 10, 0),
        at(date(2030, 9, 16), 10, 50),
    )
    .await;
    let app = test_app(pool);

    for token in [&student.token, &parent.token] {
        let (status, body) = send(&app, "GET", "/api/lessons", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["id"], json!(own));

        let uri = format!("/api/lessons?class_id={}", other_class);
        let (_, body) = send(&app, "GET", &uri, Some(token), None).await;
        assert_eq!(body["meta"]["total"], 0);

        let (status, _) =
            send(&app, "GET", &format!("/api/lessons/{}", other), Some(token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, body) = send(&app, "GET", "/api/lessons", Some(&teacher_token), None).await;
    assert_eq!(body["meta"]["total"], 2);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/lessons/{}", own),
        Some(&student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!(
        "/api/lessons/availability?teacher_id={}&day=MONDAY&start_time=09:00&end_time=09:50",
        t.teacher_id
    );
    let (status, _) = send(&app, "GET", &uri, Some(&student.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
