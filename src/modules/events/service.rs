use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_auth::Role;
use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::{ClassId, EventId};

use crate::modules::events::model::{
    CreateEventDto, Event, MIN_EVENT_MINUTES, NoticeFilterParams, PaginatedEventsResponse,
    UpdateEventDto,
};
use crate::utils::viewer::NOTICE_SCOPE;
use crate::utils::{Viewer, map_db_error, school_now};

const EVENT_SELECT: &str = r#"SELECT n.id, n.title, n.description, n.start_time, n.end_time,
       n.class_id, c.name AS class_name, n.created_at
FROM events n
LEFT JOIN classes c ON c.id = n.class_id"#;

fn check_event_times(
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    new_start: bool,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    if new_start && start_time < now {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Event cannot start in the past"
        )));
    }
    if end_time <= start_time {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "End time must be after start time"
        )));
    }
    if (end_time - start_time).num_minutes() < MIN_EVENT_MINUTES {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Event must last at least {} minutes",
            MIN_EVENT_MINUTES
        )));
    }
    Ok(())
}

/// Teachers may address a class only if they hold a lesson in it.
/// School-wide notices are open to all staff.
pub(crate) async fn ensure_may_address(
    db: &PgPool,
    viewer: Viewer,
    class_id: Option<ClassId>,
) -> Result<(), AppError> {
    let Some(class_id) = class_id else {
        return Ok(());
    };

    match viewer.role {
        Role::Admin => Ok(()),
        Role::Teacher => {
            let teaches = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM lessons WHERE teacher_id = $1 AND class_id = $2)",
            )
            .bind(viewer.id)
            .bind(class_id)
            .fetch_one(db)
            .await?;

            if teaches {
                Ok(())
            } else {
                Err(AppError::forbidden(anyhow::anyhow!(
                    "Teachers can only address classes they teach"
                )))
            }
        }
        Role::Student | Role::Parent => Err(AppError::forbidden(anyhow::anyhow!("Access denied"))),
    }
}

/// Updates and deletes of an existing notice. School-wide notices are
/// admin-managed; teachers may only touch notices for classes they teach.
pub(crate) async fn ensure_may_manage(
    db: &PgPool,
    viewer: Viewer,
    class_id: Option<ClassId>,
) -> Result<(), AppError> {
    if viewer.role == Role::Teacher && class_id.is_none() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only admins can change school-wide notices"
        )));
    }
    ensure_may_address(db, viewer, class_id).await
}

pub struct EventService;

impl EventService {
    #[instrument(skip(db))]
    pub async fn create_event(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        check_event_times(dto.start_time, dto.end_time, true, school_now())?;
        ensure_may_address(db, viewer, dto.class_id).await?;

        let event_id = sqlx::query_scalar::<_, EventId>(
            r#"INSERT INTO events (title, description, start_time, end_time, class_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.class_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(event_id = %event_id, "event created");

        Self::get_event(db, viewer, event_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_events(
        db: &PgPool,
        viewer: Viewer,
        filters: NoticeFilterParams,
    ) -> Result<PaginatedEventsResponse, AppError> {
        let where_clause = format!(
            r#"WHERE {}
                 AND ($3::uuid IS NULL OR n.class_id = $3)
                 AND ($4::text IS NULL OR n.title ILIKE '%' || $4 || '%')"#,
            NOTICE_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM events n {}",
            where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let events = sqlx::query_as::<_, Event>(&format!(
            "{} {} ORDER BY n.start_time DESC LIMIT $5 OFFSET $6",
            EVENT_SELECT, where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedEventsResponse {
            data: events,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_event(
        db: &PgPool,
        viewer: Viewer,
        event_id: EventId,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "{} WHERE {} AND n.id = $3",
            EVENT_SELECT, NOTICE_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(event_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Event not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_event(
        db: &PgPool,
        viewer: Viewer,
        event_id: EventId,
        dto: UpdateEventDto,
    ) -> Result<Event, AppError> {
        let existing = Self::get_event(db, viewer, event_id).await?;
        ensure_may_manage(db, viewer, existing.class_id).await?;

        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);
        check_event_times(start_time, end_time, dto.start_time.is_some(), school_now())?;

        let class_id = dto.class_id.unwrap_or(existing.class_id);
        if class_id != existing.class_id {
            ensure_may_address(db, viewer, class_id).await?;
        }

        sqlx::query(
            r#"UPDATE events
               SET title = $1, description = $2, start_time = $3, end_time = $4, class_id = $5
               WHERE id = $6"#,
        )
        .bind(dto.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(start_time)
        .bind(end_time)
        .bind(class_id)
        .bind(event_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_event(db, viewer, event_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_event(
        db: &PgPool,
        viewer: Viewer,
        event_id: EventId,
    ) -> Result<(), AppError> {
        let existing = Self::get_event(db, viewer, event_id).await?;
        ensure_may_manage(db, viewer, existing.class_id).await?;

        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(db)
            .await?;

        Ok(())
    }
}
