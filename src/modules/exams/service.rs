use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::ExamId;

use crate::modules::exams::model::{
    AssessmentFilterParams, CreateExamDto, Exam, PaginatedExamsResponse, UpdateExamDto,
};
use crate::modules::lessons::service::LessonService;
use crate::utils::viewer::LESSON_SCOPE;
use crate::utils::{Viewer, map_db_error, school_now};

const EXAM_SELECT: &str = r#"SELECT e.id, e.title, e.start_time, e.end_time, e.lesson_id,
       l.subject_id, s.name AS subject_name,
       l.class_id, c.name AS class_name,
       l.teacher_id, t.name AS teacher_name, t.surname AS teacher_surname,
       e.created_at
FROM exams e
JOIN lessons l ON l.id = e.lesson_id
JOIN subjects s ON s.id = l.subject_id
JOIN classes c ON c.id = l.class_id
JOIN teachers t ON t.id = l.teacher_id"#;

/// `start_time` is only checked against `now` when it is being set.
fn check_exam_times(
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    new_start: bool,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    if end_time <= start_time {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "End time must be after start time"
        )));
    }
    if new_start && start_time < now {
        return Err(AppError::unprocessable(anyhow::anyhow!(
            "Exam cannot start in the past"
        )));
    }
    Ok(())
}

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db))]
    pub async fn create_exam(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        check_exam_times(dto.start_time, dto.end_time, true, school_now())?;
        LessonService::ensure_owns_lesson(db, viewer, dto.lesson_id).await?;

        let exam_id = sqlx::query_scalar::<_, ExamId>(
            r#"INSERT INTO exams (title, start_time, end_time, lesson_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.title.trim())
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.lesson_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(exam_id = %exam_id, lesson_id = %dto.lesson_id, "exam scheduled");

        Self::get_exam(db, viewer, exam_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_exams(
        db: &PgPool,
        viewer: Viewer,
        filters: AssessmentFilterParams,
    ) -> Result<PaginatedExamsResponse, AppError> {
        let where_clause = format!(
            r#"WHERE {}
                 AND ($3::uuid IS NULL OR l.class_id = $3)
                 AND ($4::uuid IS NULL OR l.teacher_id = $4)
                 AND ($5::text IS NULL
                      OR e.title ILIKE '%' || $5 || '%'
                      OR s.name ILIKE '%' || $5 || '%')"#,
            LESSON_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*)
               FROM exams e
               JOIN lessons l ON l.id = e.lesson_id
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

        let exams = sqlx::query_as::<_, Exam>(&format!(
            "{} {} ORDER BY e.start_time, e.title LIMIT $6 OFFSET $7",
            EXAM_SELECT, where_clause
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

        Ok(PaginatedExamsResponse {
            data: exams,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    /// Exams outside the viewer's scope read as missing.
    #[instrument(skip(db))]
    pub async fn get_exam(db: &PgPool, viewer: Viewer, exam_id: ExamId) -> Result<Exam, AppError> {
        sqlx::query_as::<_, Exam>(&format!(
            "{} WHERE {} AND e.id = $3",
            EXAM_SELECT, LESSON_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(exam_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_exam(
        db: &PgPool,
        viewer: Viewer,
        exam_id: ExamId,
        dto: UpdateExamDto,
    ) -> Result<Exam, AppError> {
        let existing = Self::get_exam(db, viewer, exam_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);
        check_exam_times(start_time, end_time, dto.start_time.is_some(), school_now())?;

        let lesson_id = dto.lesson_id.unwrap_or(existing.lesson_id);
        if lesson_id != existing.lesson_id {
            LessonService::ensure_owns_lesson(db, viewer, lesson_id).await?;
        }

        sqlx::query(
            r#"UPDATE exams
               SET title = $1, start_time = $2, end_time = $3, lesson_id = $4
               WHERE id = $5"#,
        )
        .bind(dto.title.as_deref().map(str::trim).unwrap_or(&existing.title))
        .bind(start_time)
        .bind(end_time)
        .bind(lesson_id)
        .bind(exam_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_exam(db, viewer, exam_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, viewer: Viewer, exam_id: ExamId) -> Result<(), AppError> {
        let existing = Self::get_exam(db, viewer, exam_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(exam_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn exam_must_end_after_it_starts() {
        let err = check_exam_times(at(6, 10), at(6, 10), true, at(1, 8)).unwrap_err();
        assert_eq!(err.message(), "End time must be after start time");
    }

    #[test]
    fn new_exam_cannot_start_in_the_past() {
        let err = check_exam_times(at(6, 10), at(6, 11), true, at(7, 8)).unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert!(check_exam_times(at(8, 10), at(8, 11), true, at(7, 8)).is_ok());
    }

    #[test]
    fn past_exam_keeps_its_start_on_edit() {
        assert!(check_exam_times(at(6, 10), at(6, 11), false, at(7, 8)).is_ok());
    }
}
