use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_auth::Role;
use scholaris_core::{AppError, PaginationMeta, hash_password};
use scholaris_models::ParentId;
use scholaris_observability::track_user_created;

use crate::modules::parents::model::{
    CreateParentDto, PaginatedParentsResponse, Parent, ParentFilterParams, UpdateParentDto,
};
use crate::utils::map_db_error;

const PARENT_SELECT: &str = r#"SELECT p.id, u.username, p.name, p.surname, p.email, p.phone,
       p.address, p.created_at, p.updated_at,
       ARRAY(SELECT s.name || ' ' || s.surname FROM students s
             WHERE s.parent_id = p.id ORDER BY s.surname, s.name) AS students
FROM parents p
JOIN users u ON u.id = p.id"#;

pub struct ParentService;

impl ParentService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_parent(db: &PgPool, dto: CreateParentDto) -> Result<Parent, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let mut tx = db.begin().await?;

        let parent_id = sqlx::query_scalar::<_, ParentId>(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dto.username.trim())
        .bind(&hashed_password)
        .bind(Role::Parent)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"INSERT INTO parents (id, name, surname, email, phone, address)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(parent_id)
        .bind(dto.name.trim())
        .bind(dto.surname.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        track_user_created(Role::Parent.as_str());
        info!(parent_id = %parent_id, "parent created");

        Self::get_parent(db, parent_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_parents(
        db: &PgPool,
        filters: ParentFilterParams,
    ) -> Result<PaginatedParentsResponse, AppError> {
        let where_clause = r#"
            WHERE ($1::text IS NULL
                   OR p.name ILIKE '%' || $1 || '%'
                   OR p.surname ILIKE '%' || $1 || '%')"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM parents p {}",
            where_clause
        ))
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let parents = sqlx::query_as::<_, Parent>(&format!(
            "{} {} ORDER BY p.surname, p.name LIMIT $2 OFFSET $3",
            PARENT_SELECT, where_clause
        ))
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedParentsResponse {
            data: parents,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_parent(db: &PgPool, parent_id: ParentId) -> Result<Parent, AppError> {
        sqlx::query_as::<_, Parent>(&format!("{} WHERE p.id = $1", PARENT_SELECT))
            .bind(parent_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        parent_id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<Parent, AppError> {
        let existing = Self::get_parent(db, parent_id).await?;
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE users
               SET username = $1, password = COALESCE($2, password), updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(dto.username.as_deref().map(str::trim).unwrap_or(&existing.username))
        .bind(&hashed_password)
        .bind(parent_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"UPDATE parents
               SET name = $1, surname = $2, email = $3, phone = $4, address = $5,
                   updated_at = NOW()
               WHERE id = $6"#,
        )
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(dto.surname.as_deref().map(str::trim).unwrap_or(&existing.surname))
        .bind(dto.email.or(existing.email))
        .bind(dto.phone.unwrap_or(existing.phone))
        .bind(dto.address.unwrap_or(existing.address))
        .bind(parent_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        Self::get_parent(db, parent_id).await
    }

    /// Parents with enrolled children cannot be removed.
    #[instrument(skip(db))]
    pub async fn delete_parent(db: &PgPool, parent_id: ParentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(parent_id)
            .bind(Role::Parent)
            .execute(db)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Parent not found")));
        }
        Ok(())
    }
}
