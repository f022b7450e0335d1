//! Results, their role-scoped listing, summary and export.
//!
//! Every read goes through one filtered statement over a derived table `rv`
//! that already joins the exam or assignment, its lesson and the student.
//! Binds: `$1` role, `$2` viewer id, `$3..$6` id lists (student, teacher,
//! subject, class), `$7` title, `$8` search, `$9` module.

use sqlx::{PgPool, Postgres, postgres::PgArguments, query::QueryAs};
use tracing::{info, instrument};

use scholaris_core::{AppError, PaginationMeta};
use scholaris_documents::{ResultsReport, SchoolHeader, results_csv};
use scholaris_models::{AssignmentId, ExamId, ResultId, TeacherId};
use scholaris_observability::track_document_generated;

use crate::modules::results::model::{
    CreateResultDto, ExportFormat, PaginatedResultsResponse, ResultEntry, ResultFilterParams,
    ResultListParams, ResultSummaryResponse, UpdateResultDto,
};
use crate::utils::viewer::STUDENT_SCOPE;
use crate::utils::{Viewer, map_db_error, school_today};

fn scoped_results() -> String {
    format!(
        r#"(SELECT r.id, r.score, r.exam_id, r.assignment_id,
                  COALESCE(e.title, a.title) AS title,
                  COALESCE(e.start_time, a.start_date) AS date,
                  r.student_id, st.name AS student_name, st.surname AS student_surname,
                  l.teacher_id, t.name AS teacher_name, t.surname AS teacher_surname,
                  l.subject_id, s.name AS subject_name,
                  l.class_id, c.name AS class_name,
                  r.created_at
           FROM results r
           JOIN students st ON st.id = r.student_id
           LEFT JOIN exams e ON e.id = r.exam_id
           LEFT JOIN assignments a ON a.id = r.assignment_id
           JOIN lessons l ON l.id = COALESCE(e.lesson_id, a.lesson_id)
           JOIN subjects s ON s.id = l.subject_id
           JOIN classes c ON c.id = l.class_id
           JOIN teachers t ON t.id = l.teacher_id
           WHERE {}) rv"#,
        STUDENT_SCOPE
    )
}

const RESULT_FILTERS: &str = r#"
    WHERE (cardinality($3::uuid[]) = 0 OR rv.student_id = ANY($3))
      AND (cardinality($4::uuid[]) = 0 OR rv.teacher_id = ANY($4))
      AND (cardinality($5::uuid[]) = 0 OR rv.subject_id = ANY($5))
      AND (cardinality($6::uuid[]) = 0 OR rv.class_id = ANY($6))
      AND ($7::text IS NULL OR rv.title = $7)
      AND ($8::text IS NULL
           OR rv.title ILIKE '%' || $8 || '%'
           OR rv.subject_name ILIKE '%' || $8 || '%'
           OR rv.student_name ILIKE '%' || $8 || '%'
           OR rv.student_surname ILIKE '%' || $8 || '%'
           OR rv.teacher_name ILIKE '%' || $8 || '%'
           OR rv.teacher_surname ILIKE '%' || $8 || '%'
           OR rv.class_name ILIKE '%' || $8 || '%')
      AND ($9::uuid IS NULL OR EXISTS (
              SELECT 1 FROM academic_modules m
              WHERE m.id = $9 AND rv.date::date BETWEEN m.start_date AND m.end_date))"#;

fn bind_filters<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    viewer: Viewer,
    filters: &'q ResultFilterParams,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(viewer.role)
        .bind(viewer.id)
        .bind(&filters.student_id)
        .bind(&filters.teacher_id)
        .bind(&filters.subject_id)
        .bind(&filters.class_id)
        .bind(&filters.title)
        .bind(&filters.search)
        .bind(filters.module_id)
}

/// An export file ready to be sent.
#[derive(Debug)]
pub struct ResultExport {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ResultService;

impl ResultService {
    #[instrument(skip(db))]
    pub async fn create_result(
        db: &PgPool,
        viewer: Viewer,
        dto: CreateResultDto,
    ) -> Result<ResultEntry, AppError> {
        Self::ensure_owns_source(db, viewer, dto.exam_id, dto.assignment_id).await?;

        let result_id = sqlx::query_scalar::<_, ResultId>(
            r#"INSERT INTO results (score, exam_id, assignment_id, student_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.score)
        .bind(dto.exam_id)
        .bind(dto.assignment_id)
        .bind(dto.student_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(result_id = %result_id, student_id = %dto.student_id, "result recorded");

        Self::get_result(db, viewer, result_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_results(
        db: &PgPool,
        viewer: Viewer,
        params: ResultListParams,
    ) -> Result<PaginatedResultsResponse, AppError> {
        let filters = &params.filters;

        let count_sql = format!("SELECT COUNT(*) FROM {} {}", scoped_results(), RESULT_FILTERS);
        let (total,) = bind_filters(sqlx::query_as::<_, (i64,)>(&count_sql), viewer, filters)
            .fetch_one(db)
            .await?;

        let list_sql = format!(
            "SELECT rv.* FROM {} {} ORDER BY {} LIMIT $10 OFFSET $11",
            scoped_results(),
            RESULT_FILTERS,
            filters.sort.order_by()
        );
        let results = bind_filters(sqlx::query_as::<_, ResultEntry>(&list_sql), viewer, filters)
            .bind(params.pagination.limit())
            .bind(params.pagination.offset())
            .fetch_all(db)
            .await?;

        Ok(PaginatedResultsResponse {
            data: results,
            meta: PaginationMeta::from_params(total, &params.pagination),
        })
    }

    /// Every matching result, unpaginated, in the requested order.
    #[instrument(skip(db))]
    pub async fn get_all_results(
        db: &PgPool,
        viewer: Viewer,
        filters: &ResultFilterParams,
    ) -> Result<Vec<ResultEntry>, AppError> {
        let sql = format!(
            "SELECT rv.* FROM {} {} ORDER BY {}",
            scoped_results(),
            RESULT_FILTERS,
            filters.sort.order_by()
        );
        let results = bind_filters(sqlx::query_as::<_, ResultEntry>(&sql), viewer, filters)
            .fetch_all(db)
            .await?;

        Ok(results)
    }

    #[instrument(skip(db))]
    pub async fn get_summary(
        db: &PgPool,
        viewer: Viewer,
        filters: ResultFilterParams,
    ) -> Result<ResultSummaryResponse, AppError> {
        let sql = format!("SELECT rv.score FROM {} {}", scoped_results(), RESULT_FILTERS);
        let scores: Vec<i32> = bind_filters(sqlx::query_as::<_, (i32,)>(&sql), viewer, &filters)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(|(score,)| score)
            .collect();

        Ok(ResultSummaryResponse::from_scores(&scores))
    }

    #[instrument(skip(db, school))]
    pub async fn export_results(
        db: &PgPool,
        viewer: Viewer,
        format: ExportFormat,
        filters: ResultFilterParams,
        school: SchoolHeader,
    ) -> Result<ResultExport, AppError> {
        let results = Self::get_all_results(db, viewer, &filters).await?;
        let today = school_today();

        let bytes = match format {
            ExportFormat::Csv => results_csv(&results)?,
            ExportFormat::Pdf => ResultsReport {
                school,
                generated_on: today,
                results: &results,
            }
            .render()?,
        };

        track_document_generated(&format!("results_{}", format));
        info!(rows = results.len(), %format, "results exported");

        Ok(ResultExport {
            format,
            filename: format!("results-{}.{}", today.format("%Y-%m-%d"), format),
            bytes,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_result(
        db: &PgPool,
        viewer: Viewer,
        result_id: ResultId,
    ) -> Result<ResultEntry, AppError> {
        let sql = format!("SELECT rv.* FROM {} WHERE rv.id = $3", scoped_results());
        sqlx::query_as::<_, ResultEntry>(&sql)
            .bind(viewer.role)
            .bind(viewer.id)
            .bind(result_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Result not found")))
    }

    /// Passing either `exam_id` or `assignment_id` replaces the source.
    #[instrument(skip(db))]
    pub async fn update_result(
        db: &PgPool,
        viewer: Viewer,
        result_id: ResultId,
        dto: UpdateResultDto,
    ) -> Result<ResultEntry, AppError> {
        let existing = Self::get_result(db, viewer, result_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        let (exam_id, assignment_id) = if dto.exam_id.is_some() || dto.assignment_id.is_some() {
            Self::ensure_owns_source(db, viewer, dto.exam_id, dto.assignment_id).await?;
            (dto.exam_id, dto.assignment_id)
        } else {
            (existing.exam_id, existing.assignment_id)
        };

        sqlx::query(
            r#"UPDATE results
               SET score = $1, exam_id = $2, assignment_id = $3, student_id = $4
               WHERE id = $5"#,
        )
        .bind(dto.score.unwrap_or(existing.score))
        .bind(exam_id)
        .bind(assignment_id)
        .bind(dto.student_id.unwrap_or(existing.student_id))
        .bind(result_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_result(db, viewer, result_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_result(
        db: &PgPool,
        viewer: Viewer,
        result_id: ResultId,
    ) -> Result<(), AppError> {
        let existing = Self::get_result(db, viewer, result_id).await?;
        viewer.ensure_acts_for(existing.teacher_id)?;

        sqlx::query("DELETE FROM results WHERE id = $1")
            .bind(result_id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// The exam or assignment must exist and sit on one of the viewer's
    /// lessons.
    async fn ensure_owns_source(
        db: &PgPool,
        viewer: Viewer,
        exam_id: Option<ExamId>,
        assignment_id: Option<AssignmentId>,
    ) -> Result<(), AppError> {
        let teacher_id = match (exam_id, assignment_id) {
            (Some(exam_id), None) => sqlx::query_scalar::<_, TeacherId>(
                "SELECT l.teacher_id FROM exams e JOIN lessons l ON l.id = e.lesson_id WHERE e.id = $1",
            )
            .bind(exam_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Exam not found")))?,
            (None, Some(assignment_id)) => sqlx::query_scalar::<_, TeacherId>(
                "SELECT l.teacher_id FROM assignments a JOIN lessons l ON l.id = a.lesson_id WHERE a.id = $1",
            )
            .bind(assignment_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Assignment not found")))?,
            _ => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Provide either an exam or an assignment"
                )));
            }
        };

        viewer.ensure_acts_for(teacher_id)
    }
}
