use sqlx::PgPool;
use tracing::instrument;

use scholaris_core::AppError;

use crate::modules::grades::model::{CreateGradeDto, Grade};
use crate::utils::map_db_error;

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>("INSERT INTO grades (level) VALUES ($1) RETURNING id, level")
            .bind(dto.level)
            .fetch_one(db)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(db))]
    pub async fn get_grades(db: &PgPool) -> Result<Vec<Grade>, AppError> {
        let grades = sqlx::query_as::<_, Grade>("SELECT id, level FROM grades ORDER BY level")
            .fetch_all(db)
            .await?;
        Ok(grades)
    }
}
