use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::AttendanceId;

use crate::modules::attendance::model::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};
use crate::modules::lessons::service::LessonService;
use crate::utils::viewer::STUDENT_SCOPE;
use crate::utils::{Viewer, map_db_error};

const ATTENDANCE_SELECT: &str = r#"SELECT att.id, att.date, att.present, att.excused,
       att.student_id, st.name AS student_name, st.surname AS student_surname,
       att.lesson_id, l.name AS lesson_name, l.class_id,
       att.created_at
FROM attendances att
JOIN students st ON st.id = att.student_id
JOIN lessons l ON l.id = att.lesson_id"#;

/// Presence cannot be excused.
fn normalize_excused(present: bool, excused: bool) -> bool {
    !present && excused
}

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db))]
    pub async fn create_attendance(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        LessonService::ensure_owns_lesson(db, viewer, dto.lesson_id).await?;

        let attendance_id = sqlx::query_scalar::<_, AttendanceId>(
            r#"INSERT INTO attendances (date, present, excused, student_id, lesson_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(dto.date)
        .bind(dto.present)
        .bind(normalize_excused(dto.present, dto.excused))
        .bind(dto.student_id)
        .bind(dto.lesson_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(attendance_id = %attendance_id, present = dto.present, "attendance recorded");

        Self::get_attendance(db, viewer, attendance_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_attendances(
        db: &PgPool,
        viewer: Viewer,
        filters: AttendanceFilterParams,
    ) -> Result<PaginatedAttendanceResponse, AppError> {
        let where_clause = format!(
            r#"WHERE {}
                 AND ($3::uuid IS NULL OR att.student_id = $3)
                 AND ($4::uuid IS NULL OR att.lesson_id = $4)
                 AND ($5::date IS NULL OR att.date >= $5)
                 AND ($6::date IS NULL OR att.date <= $6)"#,
            STUDENT_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*)
               FROM attendances att
               JOIN students st ON st.id = att.student_id
               JOIN lessons l ON l.id = att.lesson_id
               {}"#,
            where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.student_id)
        .bind(filters.lesson_id)
        .bind(filters.from)
        .bind(filters.to)
        .fetch_one(db)
        .await?;

        let records = sqlx::query_as::<_, Attendance>(&format!(
            "{} {} ORDER BY att.date DESC, l.start_time DESC LIMIT $7 OFFSET $8",
            ATTENDANCE_SELECT, where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.student_id)
        .bind(filters.lesson_id)
        .bind(filters.from)
        .bind(filters.to)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAttendanceResponse {
            data: records,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_attendance(
        db: &PgPool,
        viewer: Viewer,
        attendance_id: AttendanceId,
    ) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "{} WHERE {} AND att.id = $3",
            ATTENDANCE_SELECT, STUDENT_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(attendance_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attendance record not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_attendance(
        db: &PgPool,
        viewer: Viewer,
        attendance_id: AttendanceId,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let existing = Self::get_attendance(db, viewer, attendance_id).await?;
        LessonService::ensure_owns_lesson(db, viewer, existing.lesson_id).await?;

        let lesson_id = dto.lesson_id.unwrap_or(existing.lesson_id);
        if lesson_id != existing.lesson_id {
            LessonService::ensure_owns_lesson(db, viewer, lesson_id).await?;
        }

        let present = dto.present.unwrap_or(existing.present);
        let excused = normalize_excused(present, dto.excused.unwrap_or(existing.excused));

        sqlx::query(
            r#"UPDATE attendances
               SET date = $1, present = $2, excused = $3, student_id = $4, lesson_id = $5
               WHERE id = $6"#,
        )
        .bind(dto.date.unwrap_or(existing.date))
        .bind(present)
        .bind(excused)
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(lesson_id)
        .bind(attendance_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_attendance(db, viewer, attendance_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(
        db: &PgPool,
        viewer: Viewer,
        attendance_id: AttendanceId,
    ) -> Result<(), AppError> {
        let existing = Self::get_attendance(db, viewer, attendance_id).await?;
        LessonService::ensure_owns_lesson(db, viewer, existing.lesson_id).await?;

        sqlx::query("DELETE FROM attendances WHERE id = $1")
            .bind(attendance_id)
            .execute(db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_absences_can_be_excused() {
        assert!(normalize_excused(false, true));
        assert!(!normalize_excused(true, true));
        assert!(!normalize_excused(false, false));
    }
}
