use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::{SubjectId, TeacherId};

use crate::modules::subjects::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, SubjectFilterParams,
    SubjectWithTeachers, TeacherRef, UpdateSubjectDto,
};
use crate::utils::map_db_error;

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db))]
    pub async fn create_subject(
        db: &PgPool,
        dto: CreateSubjectDto,
    ) -> Result<SubjectWithTeachers, AppError> {
        let mut tx = db.begin().await?;

        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(dto.name.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        Self::replace_teachers(&mut tx, subject.id, &dto.teacher_ids).await?;
        tx.commit().await?;

        Self::get_subject(db, subject.id).await
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(
        db: &PgPool,
        filters: SubjectFilterParams,
    ) -> Result<PaginatedSubjectsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subjects WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, created_at
               FROM subjects
               WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
               ORDER BY name
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&filters.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        let ids: Vec<SubjectId> = subjects.iter().map(|s| s.id).collect();
        let mut teachers = Self::teachers_by_subject(db, &ids).await?;

        let data = subjects
            .into_iter()
            .map(|subject| SubjectWithTeachers {
                teachers: teachers.remove(&subject.id).unwrap_or_default(),
                subject,
            })
            .collect();

        Ok(PaginatedSubjectsResponse {
            data,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_subject(
        db: &PgPool,
        subject_id: SubjectId,
    ) -> Result<SubjectWithTeachers, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "SELECT id, name, created_at FROM subjects WHERE id = $1",
        )
        .bind(subject_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        let teachers = Self::teachers_by_subject(db, &[subject_id])
            .await?
            .remove(&subject_id)
            .unwrap_or_default();

        Ok(SubjectWithTeachers { subject, teachers })
    }

    #[instrument(skip(db))]
    pub async fn update_subject(
        db: &PgPool,
        subject_id: SubjectId,
        dto: UpdateSubjectDto,
    ) -> Result<SubjectWithTeachers, AppError> {
        let existing = Self::get_subject(db, subject_id).await?;
        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.subject.name)
            .to_string();

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE subjects SET name = $1 WHERE id = $2")
            .bind(&name)
            .bind(subject_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if let Some(teacher_ids) = &dto.teacher_ids {
            Self::replace_teachers(&mut tx, subject_id, teacher_ids).await?;
        }

        tx.commit().await?;

        Self::get_subject(db, subject_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, subject_id: SubjectId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(subject_id)
            .execute(db)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }
        Ok(())
    }

    async fn replace_teachers(
        tx: &mut Transaction<'_, Postgres>,
        subject_id: SubjectId,
        teacher_ids: &[TeacherId],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM subject_teachers WHERE subject_id = $1")
            .bind(subject_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"INSERT INTO subject_teachers (subject_id, teacher_id)
               SELECT $1, t FROM UNNEST($2::uuid[]) AS t
               ON CONFLICT DO NOTHING"#,
        )
        .bind(subject_id)
        .bind(teacher_ids)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn teachers_by_subject(
        db: &PgPool,
        subject_ids: &[SubjectId],
    ) -> Result<HashMap<SubjectId, Vec<TeacherRef>>, AppError> {
        let rows = sqlx::query_as::<_, (SubjectId, TeacherId, String, String)>(
            r#"SELECT st.subject_id, t.id, t.name, t.surname
               FROM subject_teachers st
               JOIN teachers t ON t.id = st.teacher_id
               WHERE st.subject_id = ANY($1)
               ORDER BY t.surname, t.name"#,
        )
        .bind(subject_ids)
        .fetch_all(db)
        .await?;

        let mut grouped: HashMap<SubjectId, Vec<TeacherRef>> = HashMap::new();
        for (subject_id, id, name, surname) in rows {
            grouped
                .entry(subject_id)
                .or_default()
                .push(TeacherRef { id, name, surname });
        }
        Ok(grouped)
    }
}
