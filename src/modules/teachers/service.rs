use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use scholaris_auth::Role;
use scholaris_core::{AppError, PaginationMeta, hash_password};
use scholaris_models::{SubjectId, TeacherId};
use scholaris_observability::track_user_created;

use crate::modules::teachers::model::{
    ClassRef, CreateTeacherDto, PaginatedTeachersResponse, SubjectRef, Teacher,
    TeacherFilterParams, TeacherWithRelations, UpdateTeacherDto,
};
use crate::utils::map_db_error;

const TEACHER_SELECT: &str = r#"SELECT t.id, u.username, t.name, t.surname, t.email, t.phone,
       t.address, t.img, t.blood_type, t.gender, t.birthday, t.created_at, t.updated_at
FROM teachers t
JOIN users u ON u.id = t.id"#;

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_teacher(
        db: &PgPool,
        dto: CreateTeacherDto,
    ) -> Result<TeacherWithRelations, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let mut tx = db.begin().await?;

        let teacher_id = sqlx::query_scalar::<_, TeacherId>(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dto.username.trim())
        .bind(&hashed_password)
        .bind(Role::Teacher)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"INSERT INTO teachers
                   (id, name, surname, email, phone, address, img, blood_type, gender, birthday)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(teacher_id)
        .bind(dto.name.trim())
        .bind(dto.surname.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.img)
        .bind(&dto.blood_type)
        .bind(dto.gender)
        .bind(dto.birthday)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        Self::replace_subjects(&mut tx, teacher_id, &dto.subject_ids).await?;
        tx.commit().await?;

        track_user_created(Role::Teacher.as_str());
        info!(teacher_id = %teacher_id, "teacher created");

        Self::get_teacher(db, teacher_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        filters: TeacherFilterParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"
            WHERE ($1::uuid IS NULL OR EXISTS (
                      SELECT 1 FROM lessons l WHERE l.teacher_id = t.id AND l.class_id = $1))
              AND ($2::text IS NULL
                   OR t.name ILIKE '%' || $2 || '%'
                   OR t.surname ILIKE '%' || $2 || '%')"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM teachers t {}",
            where_clause
        ))
        .bind(filters.class_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            "{} {} ORDER BY t.surname, t.name LIMIT $3 OFFSET $4",
            TEACHER_SELECT, where_clause
        ))
        .bind(filters.class_id)
        .bind(&filters.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(
        db: &PgPool,
        teacher_id: TeacherId,
    ) -> Result<TeacherWithRelations, AppError> {
        let teacher = Self::find_teacher(db, teacher_id).await?;

        let subjects = sqlx::query_as::<_, SubjectRef>(
            r#"SELECT s.id, s.name
               FROM subject_teachers st
               JOIN subjects s ON s.id = st.subject_id
               WHERE st.teacher_id = $1
               ORDER BY s.name"#,
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        let classes = sqlx::query_as::<_, ClassRef>(
            r#"SELECT DISTINCT c.id, c.name
               FROM lessons l
               JOIN classes c ON c.id = l.class_id
               WHERE l.teacher_id = $1
               ORDER BY c.name"#,
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        Ok(TeacherWithRelations {
            teacher,
            subjects,
            classes,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        teacher_id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherWithRelations, AppError> {
        let existing = Self::find_teacher(db, teacher_id).await?;

        let username = dto.username.as_deref().map(str::trim).unwrap_or(&existing.username);
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE users
               SET username = $1, password = COALESCE($2, password), updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(username)
        .bind(&hashed_password)
        .bind(teacher_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"UPDATE teachers
               SET name = $1, surname = $2, email = $3, phone = $4, address = $5, img = $6,
                   blood_type = $7, gender = $8, birthday = $9, updated_at = NOW()
               WHERE id = $10"#,
        )
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(dto.surname.as_deref().map(str::trim).unwrap_or(&existing.surname))
        .bind(dto.email.or(existing.email))
        .bind(dto.phone.or(existing.phone))
        .bind(dto.address.unwrap_or(existing.address))
        .bind(dto.img.or(existing.img))
        .bind(dto.blood_type.unwrap_or(existing.blood_type))
        .bind(dto.gender.unwrap_or(existing.gender))
        .bind(dto.birthday.unwrap_or(existing.birthday))
        .bind(teacher_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if let Some(subject_ids) = &dto.subject_ids {
            Self::replace_subjects(&mut tx, teacher_id, subject_ids).await?;
        }

        tx.commit().await?;

        Self::get_teacher(db, teacher_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, teacher_id: TeacherId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(teacher_id)
            .bind(Role::Teacher)
            .execute(db)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }
        Ok(())
    }

    async fn find_teacher(db: &PgPool, teacher_id: TeacherId) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!("{} WHERE t.id = $1", TEACHER_SELECT))
            .bind(teacher_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
    }

    async fn replace_subjects(
        tx: &mut Transaction<'_, Postgres>,
        teacher_id: TeacherId,
        subject_ids: &[SubjectId],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM subject_teachers WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"INSERT INTO subject_teachers (subject_id, teacher_id)
               SELECT s, $1 FROM UNNEST($2::uuid[]) AS s
               ON CONFLICT DO NOTHING"#,
        )
        .bind(teacher_id)
        .bind(subject_ids)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
