use sqlx::PgPool;
use tracing::instrument;

use scholaris_core::{AppError, PaginationMeta};
use scholaris_models::ClassId;

use crate::modules::classes::model::{
    Class, ClassFilterParams, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use crate::utils::map_db_error;

pub(crate) const CLASS_SELECT: &str = r#"SELECT c.id, c.name, c.capacity, c.grade_id, g.level AS grade_level,
       c.supervisor_id, t.name || ' ' || t.surname AS supervisor_name,
       (SELECT COUNT(*) FROM students s WHERE s.class_id = c.id) AS student_count,
       c.created_at, c.updated_at
FROM classes c
JOIN grades g ON g.id = c.grade_id
LEFT JOIN teachers t ON t.id = c.supervisor_id"#;

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let class_id = sqlx::query_scalar::<_, ClassId>(
            r#"INSERT INTO classes (name, capacity, grade_id, supervisor_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(dto.capacity)
        .bind(dto.grade_id)
        .bind(dto.supervisor_id)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        Self::get_class(db, class_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_classes(
        db: &PgPool,
        filters: ClassFilterParams,
    ) -> Result<PaginatedClassesResponse, AppError> {
        let where_clause = r#"
            WHERE ($1::uuid IS NULL OR c.supervisor_id = $1)
              AND ($2::text IS NULL OR c.name ILIKE '%' || $2 || '%')"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM classes c {}",
            where_clause
        ))
        .bind(filters.supervisor_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let classes = sqlx::query_as::<_, Class>(&format!(
            "{} {} ORDER BY g.level, c.name LIMIT $3 OFFSET $4",
            CLASS_SELECT, where_clause
        ))
        .bind(filters.supervisor_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedClassesResponse {
            data: classes,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, class_id: ClassId) -> Result<Class, AppError> {
        sqlx::query_as::<_, Class>(&format!("{} WHERE c.id = $1", CLASS_SELECT))
            .bind(class_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_class(
        db: &PgPool,
        class_id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let existing = Self::get_class(db, class_id).await?;

        let capacity = dto.capacity.unwrap_or(existing.capacity);
        if i64::from(capacity) < existing.student_count {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Capacity cannot be lower than the {} enrolled students",
                existing.student_count
            )));
        }

        sqlx::query(
            r#"UPDATE classes
               SET name = $1, capacity = $2, grade_id = $3, supervisor_id = $4,
                   updated_at = NOW()
               WHERE id = $5"#,
        )
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(capacity)
        .bind(dto.grade_id.unwrap_or(existing.grade_id))
        .bind(dto.supervisor_id.or(existing.supervisor_id))
        .bind(class_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_class(db, class_id).await
    }

    /// Classes with enrolled students cannot be removed.
    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, class_id: ClassId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(db)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }
        Ok(())
    }
}
