mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    at, create_admin, create_class, create_grade, create_lesson, create_parent, create_student,
    create_subject, create_teacher, date, send, test_app,
};

async fn insert_event(pool: &PgPool, title: &str, class_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar(
        r#"INSERT INTO events (title, description, start_time, end_time, class_id)
           VALUES ($1, 'Details', '2030-10-01 12:00', '2030-10-01 14:00', $2)
           RETURNING id"#,
    )
    .bind(title)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    let mut titles: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

#[sqlx::test(migrations = "./migrations")]
async fn events_are_scoped_to_the_viewers_classes(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let teacher = create_teacher(&pool).await;
    let parent = create_parent(&pool).await;
    let grade = create_grade(&pool, 5).await;
    let own_class = create_class(&pool, grade, 30).await;
    let other_class = create_class(&pool, grade, 30).await;
    let subject = create_subject(&pool).await;
    create_lesson(
        &pool,
        teacher.id,
        own_class,
        subject,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;
    let student = create_student(&pool, grade, own_class, parent.id).await;

    insert_event(&pool, "Open day", None).await;
    insert_event(&pool, "Own trip", Some(own_class)).await;
    insert_event(&pool, "Other trip", Some(other_class)).await;
    let app = test_app(pool);

    for token in [&student.token, &parent.token, &teacher.token] {
        let (status, body) = send(&app, "GET", "/api/events", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), ["Open day", "Own trip"]);
    }

    let (_, body) = send(&app, "GET", "/api/events", Some(&admin.token), None).await;
    assert_eq!(body["meta"]["total"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn teacher_can_only_address_taught_classes(pool: PgPool) {
    let teacher = create_teacher(&pool).await;
    let grade = create_grade(&pool, 6).await;
    let class = create_class(&pool, grade, 30).await;
    let app = test_app(pool);

    let event = json!({
        "title": "Science fair",
        "description": "Bring your projects",
        "start_time": "2030-10-01T12:00:00",
        "end_time": "2030-10-01T14:00:00",
        "class_id": class,
    });
    let (status, _) = send(&app, "POST", "/api/events", Some(&teacher.token), Some(event)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let school_wide = json!({
        "title": "Science fair",
        "description": "Bring your projects",
        "start_time": "2030-10-01T12:00:00",
        "end_time": "2030-10-01T14:00:00",
    });
    let (status, body) =
        send(&app, "POST", "/api/events", Some(&teacher.token), Some(school_wide)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["class_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn event_times_are_validated(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = test_app(pool);

    let cases = [
        ("2030-10-01T12:00:00", "2030-10-01T12:10:00"),
        ("2030-10-01T12:00:00", "2030-10-01T11:00:00"),
        ("2020-10-01T12:00:00", "2020-10-01T14:00:00"),
    ];
    for (start, end) in cases {
        let (status, _) = send(
            &app,
            "POST",
            "/api/events",
            Some(&admin.token),
            Some(json!({
                "title": "Assembly",
                "description": "Main hall",
                "start_time": start,
                "end_time": end,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} - {}", start, end);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn announcements_cannot_be_backdated(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let student_parent = create_parent(&pool).await;
    let app = test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/announcements",
        Some(&admin.token),
        Some(json!({ "title": "Late", "description": "Too late", "date": "2020-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, created) = send(
        &app,
        "POST",
        "/api/announcements",
        Some(&admin.token),
        Some(json!({ "title": "Holiday", "description": "No school", "date": "2030-12-24" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/announcements/{}", created["id"].as_str().unwrap());
    let (status, body) = send(&app, "GET", &uri, Some(&student_parent.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Holiday");

    let (status, _) = send(&app, "DELETE", &uri, Some(&student_parent.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn school_wide_notices_are_admin_managed(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let teacher = create_teacher(&pool).await;
    let grade = create_grade(&pool, 7).await;
    let class = create_class(&pool, grade, 30).await;
    let subject = create_subject(&pool).await;
    create_lesson(
        &pool,
        teacher.id,
        class,
        subject,
        at(date(2030, 9, 16), 9, 0),
        at(date(2030, 9, 16), 9, 50),
    )
    .await;

    let open_day = insert_event(&pool, "Open day", None).await;
    let class_trip = insert_event(&pool, "Class trip", Some(class)).await;
    let app = test_app(pool);

    let uri = format!("/api/events/{}", open_day);
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&teacher.token),
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &uri, Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/events/{}", class_trip),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, notice) = send(
        &app,
        "POST",
        "/api/announcements",
        Some(&admin.token),
        Some(json!({ "title": "Holiday", "description": "No school", "date": "2030-12-24" })),
    )
    .await;
    let uri = format!("/api/announcements/{}", notice["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn null_class_makes_a_notice_school_wide(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let grade = create_grade(&pool, 8).await;
    let class = create_class(&pool, grade, 30).await;
    let event = insert_event(&pool, "Class trip", Some(class)).await;
    let app = test_app(pool);
    let uri = format!("/api/events/{}", event);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({ "title": "Museum trip" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class_id"], json!(class));

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({ "class_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["class_id"].is_null());
    assert_eq!(body["title"], "Museum trip");

    let (_, notice) = send(
        &app,
        "POST",
        "/api/announcements",
        Some(&admin.token),
        Some(json!({
            "title": "Test week",
            "description": "Revise",
            "date": "2030-12-01",
            "class_id": class,
        })),
    )
    .await;
    let uri = format!("/api/announcements/{}", notice["id"].as_str().unwrap());
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin.token),
        Some(json!({ "class_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["class_id"].is_null());
}
