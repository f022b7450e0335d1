//! Lesson timetable.
//!
//! Every write that books a teacher runs in a transaction holding an advisory
//! lock keyed on the teacher, so two concurrent bookings cannot both pass the
//! availability check.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::{LessonId, TeacherId};
use scholaris_observability::{track_lessons_created, track_schedule_conflict};
use scholaris_scheduling::{
    Candidate, Occurrence, SchoolDay, TeachingHours, TimeSlot, WeeklyTemplate,
    conflicting_occurrences, find_conflicts, occurrence_name, occurrences,
};

use crate::modules::academic_modules::service::AcademicModuleService;
use crate::modules::lessons::model::{
    AvailabilityParams, AvailabilityResponse, CreateLessonDto, CreateRecurringLessonsDto, Lesson,
    LessonFilterParams, PaginatedLessonsResponse, RecurringLessonsResponse, UpdateLessonDto,
};
use crate::utils::viewer::TIMETABLE_SCOPE;
use crate::utils::{Viewer, map_db_error, map_schedule_error};

pub const TEACHER_BUSY_MESSAGE: &str = "Teacher is not available in this time slot";

pub(crate) const LESSON_SELECT: &str = r#"SELECT l.id, l.name, l.day, l.start_time, l.end_time,
       l.subject_id, s.name AS subject_name,
       l.class_id, c.name AS class_name,
       l.teacher_id, t.name AS teacher_name, t.surname AS teacher_surname,
       l.created_at
FROM lessons l
JOIN subjects s ON s.id = l.subject_id
JOIN classes c ON c.id = l.class_id
JOIN teachers t ON t.id = l.teacher_id"#;

pub struct LessonService;

impl LessonService {
    #[instrument(skip(db))]
    pub async fn create_lesson(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        viewer.ensure_acts_for(dto.teacher_id)?;

        let slot = TeachingHours::default()
            .check_lesson(dto.day, &dto.start_time, &dto.end_time)
            .map_err(map_schedule_error)?;

        let mut tx = db.begin().await?;
        Self::lock_teacher(&mut tx, dto.teacher_id).await?;
        // Dated check: only lessons on this calendar date can clash.
        Self::ensure_available(
            &mut tx,
            dto.teacher_id,
            Candidate::on(dto.start_time.date(), dto.day, slot),
            None,
        )
        .await?;

        let lesson_id = sqlx::query_scalar::<_, LessonId>(
            r#"INSERT INTO lessons (name, day, start_time, end_time, subject_id, class_id, teacher_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(dto.day)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.subject_id)
        .bind(dto.class_id)
        .bind(dto.teacher_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        track_lessons_created("single", 1);
        info!(lesson_id = %lesson_id, teacher_id = %dto.teacher_id, "lesson created");

        Self::get_lesson(db, viewer, lesson_id).await
    }

    /// Expands a weekly template over a module, skipping its holidays.
    ///
    /// Nothing is inserted unless every date is free.
    #[instrument(skip(db))]
    pub async fn create_recurring_lessons(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateRecurringLessonsDto,
    ) -> Result<RecurringLessonsResponse, AppError> {
        viewer.ensure_acts_for(dto.teacher_id)?;

        TeachingHours::default()
            .check(&TimeSlot::new(dto.start_time, dto.end_time))
            .map_err(map_schedule_error)?;

        let module = AcademicModuleService::get_module(db, dto.module_id).await?;
        let range = module.module.date_range().map_err(map_schedule_error)?;
        let template = WeeklyTemplate::new(dto.day, dto.start_time, dto.end_time);
        let planned = occurrences(&template, &range, &module.calendar());

        if planned.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "No {} falls within module '{}' outside its holidays",
                dto.day,
                module.module.name
            )));
        }

        let mut tx = db.begin().await?;
        Self::lock_teacher(&mut tx, dto.teacher_id).await?;

        let booked = Self::teacher_lessons_between(
            &mut *tx,
            dto.teacher_id,
            dto.day,
            range.start(),
            range.end(),
        )
        .await?;

        let clashes = conflicting_occurrences(&planned, &booked);
        if !clashes.is_empty() {
            track_schedule_conflict();
            warn!(teacher_id = %dto.teacher_id, clashes = clashes.len(), "recurring lessons rejected");
            return Err(AppError::conflict(anyhow::anyhow!(
                "{} on: {}",
                TEACHER_BUSY_MESSAGE,
                format_dates(&clashes)
            )));
        }

        let names: Vec<String> = planned
            .iter()
            .map(|occurrence| occurrence_name(&dto.name, occurrence.date))
            .collect();
        let starts: Vec<_> = planned.iter().map(|occurrence| occurrence.start).collect();
        let ends: Vec<_> = planned.iter().map(|occurrence| occurrence.end).collect();

        let ids = sqlx::query_scalar::<_, LessonId>(
            r#"INSERT INTO lessons (name, day, start_time, end_time, subject_id, class_id, teacher_id)
               SELECT n, $4, st, et, $5, $6, $7
               FROM UNNEST($1::text[], $2::timestamp[], $3::timestamp[]) AS x(n, st, et)
               RETURNING id"#,
        )
        .bind(&names)
        .bind(&starts)
        .bind(&ends)
        .bind(dto.day)
        .bind(dto.subject_id)
        .bind(dto.class_id)
        .bind(dto.teacher_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        track_lessons_created("recurring", ids.len());
        info!(
            teacher_id = %dto.teacher_id,
            module_id = %dto.module_id,
            created = ids.len(),
            "recurring lessons created"
        );

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "{} WHERE l.id = ANY($1) ORDER BY l.start_time",
            LESSON_SELECT
        ))
        .bind(&ids)
        .fetch_all(db)
        .await?;

        Ok(RecurringLessonsResponse {
            total: planned.len(),
            created: lessons.len(),
            lessons,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_lessons(
        db: &PgPool,
        viewer: Viewer,
        filters: LessonFilterParams,
    ) -> Result<PaginatedLessonsResponse, AppError> {
        let where_clause = format!(
            r#"
            WHERE {}
              AND ($3::uuid IS NULL OR l.class_id = $3)
              AND ($4::uuid IS NULL OR l.teacher_id = $4)
              AND ($5::uuid IS NULL OR l.subject_id = $5)
              AND ($6::uuid IS NULL OR EXISTS (
                      SELECT 1 FROM academic_modules m
                      WHERE m.id = $6
                        AND l.start_time::date BETWEEN m.start_date AND m.end_date))
              AND ($7::text IS NULL
                   OR s.name ILIKE '%' || $7 || '%'
                   OR t.name ILIKE '%' || $7 || '%'
                   OR t.surname ILIKE '%' || $7 || '%'
                   OR c.name ILIKE '%' || $7 || '%')"#,
            TIMETABLE_SCOPE
        );

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*)
               FROM lessons l
               JOIN subjects s ON s.id = l.subject_id
               JOIN classes c ON c.id = l.class_id
               JOIN teachers t ON t.id = l.teacher_id
               {}"#,
            where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(filters.subject_id)
        .bind(filters.module_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "{} {} ORDER BY l.start_time ASC, s.name ASC LIMIT $8 OFFSET $9",
            LESSON_SELECT, where_clause
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(filters.class_id)
        .bind(filters.teacher_id)
        .bind(filters.subject_id)
        .bind(filters.module_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedLessonsResponse {
            data: lessons,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    /// Lessons outside the viewer's timetable are reported as missing.
    #[instrument(skip(db))]
    pub async fn get_lesson(
        db: &PgPool,
        viewer: Viewer,
        lesson_id: LessonId,
    ) -> Result<Lesson, AppError> {
        sqlx::query_as::<_, Lesson>(&format!(
            "{} WHERE {} AND l.id = $3",
            LESSON_SELECT, TIMETABLE_SCOPE
        ))
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(lesson_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lesson not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_lesson(
        db: &PgPool,
        viewer: Viewer,
        lesson_id: LessonId,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let existing = Self::get_lesson(db, viewer, lesson_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher_id);
        viewer.ensure_acts_for(teacher_id)?;

        let day = dto.day.unwrap_or(existing.day);
        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);

        let slot = TeachingHours::default()
            .check_lesson(day, &start_time, &end_time)
            .map_err(map_schedule_error)?;

        let mut tx = db.begin().await?;
        Self::lock_teacher(&mut tx, teacher_id).await?;
        // Dated check, ignoring the lesson being moved.
        Self::ensure_available(
            &mut tx,
            teacher_id,
            Candidate::on(start_time.date(), day, slot),
            Some(lesson_id),
        )
        .await?;

        sqlx::query(
            r#"UPDATE lessons
               SET name = $1, day = $2, start_time = $3, end_time = $4,
                   subject_id = $5, class_id = $6, teacher_id = $7
               WHERE id = $8"#,
        )
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(day)
        .bind(start_time)
        .bind(end_time)
        .bind(dto.subject_id.unwrap_or(existing.subject_id))
        .bind(dto.class_id.unwrap_or(existing.class_id))
        .bind(teacher_id)
        .bind(lesson_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        Self::get_lesson(db, viewer, lesson_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_lesson(
        db: &PgPool,
        viewer: Viewer,
        lesson_id: LessonId,
    ) -> Result<(), AppError> {
        let existing = Self::get_lesson(db, viewer, lesson_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Checks that `viewer` may attach work (exams, results, attendance) to
    /// `lesson_id`.
    pub(crate) async fn ensure_owns_lesson(
        db: &PgPool,
        viewer: Viewer,
        lesson_id: LessonId,
    ) -> Result<(), AppError> {
        let teacher_id =
            sqlx::query_scalar::<_, TeacherId>("SELECT teacher_id FROM lessons WHERE id = $1")
                .bind(lesson_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Lesson not found")))?;

        viewer.ensure_acts_for(teacher_id)
    }

    /// Read-only availability query. Without a date the check spans every
    /// week on which the teacher has a lesson on that day.
    #[instrument(skip(db))]
    pub async fn check_availability(
        db: &PgPool,
        params: AvailabilityParams,
    ) -> Result<AvailabilityResponse, AppError> {
        let slot = TimeSlot::new(params.start_time, params.end_time);
        if slot.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "End time must be after start time"
            )));
        }

        let candidate = match params.date {
            Some(date) => {
                params.day.ensure_matches(date).map_err(map_schedule_error)?;
                Candidate::on(date, params.day, slot)
            }
            None => Candidate::weekly(params.day, slot),
        };

        let booked = Self::teacher_lessons_on(
            db,
            params.teacher_id,
            params.day,
            params.date,
            params.exclude_lesson_id.map(LessonId::from),
        )
        .await?;

        let conflicts: Vec<Lesson> = find_conflicts(&candidate, &booked)
            .into_iter()
            .cloned()
            .collect();

        Ok(AvailabilityResponse {
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    async fn ensure_available(
        tx: &mut Transaction<'_, Postgres>,
        teacher_id: TeacherId,
        candidate: Candidate,
        exclude: Option<LessonId>,
    ) -> Result<(), AppError> {
        let booked =
            Self::teacher_lessons_on(&mut **tx, teacher_id, candidate.day, candidate.date, exclude)
                .await?;

        let conflicts = find_conflicts(&candidate, &booked);
        if let Some(first) = conflicts.first() {
            track_schedule_conflict();
            warn!(
                teacher_id = %teacher_id,
                conflicting_lesson = %first.id,
                "teacher double-booked"
            );
            return Err(AppError::conflict(anyhow::anyhow!(TEACHER_BUSY_MESSAGE)));
        }
        Ok(())
    }

    /// Serialises bookings of one teacher until the transaction ends.
    async fn lock_teacher(
        tx: &mut Transaction<'_, Postgres>,
        teacher_id: TeacherId,
    ) -> Result<(), AppError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(teacher_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn teacher_lessons_on<'e, E>(
        executor: E,
        teacher_id: TeacherId,
        day: SchoolDay,
        date: Option<NaiveDate>,
        exclude: Option<LessonId>,
    ) -> Result<Vec<Lesson>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            r#"{}
               WHERE l.teacher_id = $1
                 AND l.day = $2
                 AND ($3::date IS NULL OR l.start_time::date = $3)
                 AND ($4::uuid IS NULL OR l.id <> $4)
               ORDER BY l.start_time"#,
            LESSON_SELECT
        ))
        .bind(teacher_id)
        .bind(day)
        .bind(date)
        .bind(exclude)
        .fetch_all(executor)
        .await?;

        Ok(lessons)
    }

    async fn teacher_lessons_between<'e, E>(
        executor: E,
        teacher_id: TeacherId,
        day: SchoolDay,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Lesson>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            r#"{}
               WHERE l.teacher_id = $1
                 AND l.day = $2
                 AND l.start_time::date BETWEEN $3 AND $4
               ORDER BY l.start_time"#,
            LESSON_SELECT
        ))
        .bind(teacher_id)
        .bind(day)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(lessons)
    }
}

fn format_dates(clashes: &[&Occurrence]) -> String {
    clashes
        .iter()
        .map(|occurrence| occurrence.date.format("%d.%m.%Y").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn conflict_dates_are_listed_in_school_format() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let occurrence = Occurrence {
            date,
            day: SchoolDay::Monday,
            start: date.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end: date.and_time(NaiveTime::from_hms_opt(9, 50, 0).unwrap()),
        };
        let later = Occurrence {
            date: date + chrono::Duration::days(7),
            ..occurrence
        };
        assert_eq!(format_dates(&[&occurrence, &later]), "15.09.2025, 22.09.2025");
    }
}
