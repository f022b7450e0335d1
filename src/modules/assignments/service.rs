use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::AssignmentId;

use crate::modules::assignments::model::{
    AssessmentFilterParams, Assignment, CreateAssignmentDto, PaginatedAssignmentsResponse,
    UpdateAssignmentDto,
};
use crate::modules::lessons::service::LessonService;
use crate::utils::viewer::LESSON_SCOPE;
use crate::utils::{Viewer, map_db_error, school_today};

const ASSIGNMENT_SELECT: &str = r#"SELECT a.id, a.title, a.start_date, a.due_date, a.lesson_id,
       l.subject_id, s.name AS subject_name,
       l.class_id, c.name AS class_name,
       l.teacher_id, t.name AS teacher_name, t.surname AS teacher_surname,
       a.created_at
FROM assignments a
JOIN lessons l ON l.id = a.lesson_id
JOIN subjects s ON s.id = l.subject_id
JOIN classes c ON c.id = l.class_id
JOIN teachers t ON t.id = l.teacher_id"#;

fn check_assignment_dates(
    start_date: NaiveDateTime,
    due_date: NaiveDateTime,
    new_start: bool,
    today: NaiveDate,
) -> Result<(), AppError> {
    if new_start && start_date.date() < today {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Start date cannot be before today"
        )));
    }
    if due_date < start_date {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Due date cannot be before the start date"
        )));
    }
    Ok(())
}

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db))]
    pub async fn create_assignment(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        check_assignment_dates(dto.start_date, dto.due_date, true, school_today())?;
        LessonService::ensure_owns_lesson(db, viewer, dto.lesson_id).await?;

        let assignment_id = sqlx::query_scalar::<_, AssignmentId>(
            r#"INSERT INTO assignments (title, start_date, due_date, lesson_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(dto.start_date)
        .bind(dto.due_date)
        .bind(dto.lesson_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(assignment_id = %assignment_id, lesson_id = %dto.lesson_id, "assignment created");

        Self::get_assignment(db, viewer, assignment_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_assignments(
        db: &PgPool,
        viewer: Viewer,
        filters: AssessmentFilterParams,
    ) -> Result<PaginatedAssignmentsResponse, AppError> {
        let where_clause = format!(
            r#"WHERE {}
                 AND ($3::uuid IS NULL OR l.class_id = $3)
                 AND ($4::uuid IS NULL OR l.teacher_id = $4)
                 AND ($5::text IS NULL
                      OR a.title ILIKE '%' || $5 || '%'
                      OR s.name ILIKE '%' || $5 || '%')"#,
            LESSON_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*)
               FROM assignments a
               JOIN lessons l ON l.id = a.lesson_id
               JOIN subjects s ON s.id = l.subject_id
               {}"#,
            where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "{} {} ORDER BY a.due_date, a.title LIMIT $6 OFFSET $7",
            ASSIGNMENT_SELECT, where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAssignmentsResponse {
            data: assignments,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_assignment(
        db: &PgPool,
        viewer: Viewer,
        assignment_id: AssignmentId,
    ) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "{} WHERE {} AND a.id = $3",
            ASSIGNMENT_SELECT, LESSON_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(assignment_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Assignment not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_assignment(
        db: &PgPool,
        viewer: Viewer,
        assignment_id: AssignmentId,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let existing = Self::get_assignment(db, viewer, assignment_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let due_date = dto.due_date.unwrap_or(existing.due_date);
        check_assignment_dates(start_date, due_date, dto.start_date.is_some(), school_today())?;

        let lesson_id = dto.lesson_id.unwrap_or(existing.lesson_id);
        if lesson_id != existing.lesson_id {
            LessonService::ensure_owns_lesson(db, viewer, lesson_id).await?;
        }

        sqlx::query(
            r#"UPDATE assignments
               SET title = $1, start_date = $2, due_date = $3, lesson_id = $4
               WHERE id = $5"#,
        )
        .bind(dto.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(start_date)
        .bind(due_date)
        .bind(lesson_id)
        .bind(assignment_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_assignment(db, viewer, assignment_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(
        db: &PgPool,
        viewer: Viewer,
        assignment_id: AssignmentId,
    ) -> Result<(), AppError> {
        let existing = Self::get_assignment(db, viewer, assignment_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(assignment_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn starting_today_is_allowed() {
        assert!(check_assignment_dates(at(6, 8), at(13, 8), true, day(6)).is_ok());
    }

    #[test]
    fn cannot_start_before_today() {
        let err = check_assignment_dates(at(5, 8), at(13, 8), true, day(6)).unwrap_err();
        assert_eq!(err.message(), "Start date cannot be before today");
    }

    #[test]
    fn due_date_may_equal_start() {
        assert!(check_assignment_dates(at(6, 8), at(6, 8), true, day(6)).is_ok());
        assert!(check_assignment_dates(at(6, 8), at(6, 7), true, day(6)).is_err());
    }
}
