use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument, warn};

use scholaris_auth::Role;
use scholaris_core::{AppError, PaginationMeta, hash_password};
use scholaris_models::{ClassId, StudentId};
use scholaris_observability::track_user_created;

use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};
use crate::utils::map_db_error;

pub const CLASS_FULL_MESSAGE: &str = "Class is at full capacity";

pub(crate) const STUDENT_SELECT: &str = r#"SELECT s.id, u.username, s.name, s.surname, s.email, s.phone,
       s.address, s.img, s.blood_type, s.gender, s.birthday,
       s.grade_id, g.level AS grade_level,
       s.class_id, c.name AS class_name,
       s.parent_id, p.name || ' ' || p.surname AS parent_name,
       s.created_at, s.updated_at
FROM students s
JOIN users u ON u.id = s.id
JOIN grades g ON g.id = s.grade_id
JOIN classes c ON c.id = s.class_id
JOIN parents p ON p.id = s.parent_id"#;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let mut tx = db.begin().await?;

        Self::ensure_class_has_room(&mut tx, dto.class_id).await?;

        let student_id = sqlx::query_scalar::<_, StudentId>(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dto.username.trim())
        .bind(&hashed_password)
        .bind(Role::Student)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"INSERT INTO students
                   (id, name, surname, email, phone, address, img, blood_type, gender,
                    birthday, grade_id, class_id, parent_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        )
        .bind(student_id)
        .bind(dto.name.trim())
        .bind(dto.surname.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&dto.img)
        .bind(&dto.blood_type)
        .bind(dto.gender)
        .bind(dto.birthday)
        .bind(dto.grade_id)
        .bind(dto.class_id)
        .bind(dto.parent_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        track_user_created(Role::Student.as_str());
        info!(student_id = %student_id, class_id = %dto.class_id, "student created");

        Self::get_student(db, student_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let where_clause = r#"
            WHERE ($1::uuid IS NULL OR EXISTS (
                      SELECT 1 FROM lessons l WHERE l.class_id = s.class_id AND l.teacher_id = $1))
              AND ($2::uuid IS NULL OR s.class_id = $2)
              AND ($3::text IS NULL
                   OR s.name ILIKE '%' || $3 || '%'
                   OR s.surname ILIKE '%' || $3 || '%')"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM students s {}",
            where_clause
        ))
        .bind(filters.teacher_id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "{} {} ORDER BY s.surname, s.name LIMIT $4 OFFSET $5",
            STUDENT_SELECT, where_clause
        ))
        .bind(filters.teacher_id)
        .bind(filters.class_id)
        .bind(&filters.search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::from_params(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, student_id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!("{} WHERE s.id = $1", STUDENT_SELECT))
            .bind(student_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    /// Moving a student to another class checks that class's capacity.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        student_id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, student_id).await?;
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;
        let class_id = dto.class_id.unwrap_or(existing.class_id);

        let mut tx = db.begin().await?;

        if class_id != existing.class_id {
            Self::ensure_class_has_room(&mut tx, class_id).await?;
        }

        sqlx::query(
            r#"UPDATE users
               SET username = $1, password = COALESCE($2, password), updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(dto.username.as_deref().map(str::trim).unwrap_or(&existing.username))
        .bind(&hashed_password)
        .bind(student_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"UPDATE students
               SET name = $1, surname = $2, email = $3, phone = $4, address = $5, img = $6,
                   blood_type = $7, gender = $8, birthday = $9, grade_id = $10,
                   class_id = $11, parent_id = $12, updated_at = NOW()
               WHERE id = $13"#,
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
        .bind(dto.grade_id.unwrap_or(existing.grade_id))
        .bind(class_id)
        .bind(dto.parent_id.unwrap_or(existing.parent_id))
        .bind(student_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await?;

        Self::get_student(db, student_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(student_id)
            .bind(Role::Student)
            .execute(db)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }
        Ok(())
    }

    /// Locks the class row so concurrent enrolments cannot overfill it.
    async fn ensure_class_has_room(
        tx: &mut Transaction<'_, Postgres>,
        class_id: ClassId,
    ) -> Result<(), AppError> {
        let (capacity, enrolled) = sqlx::query_as::<_, (i32, i64)>(
            r#"SELECT c.capacity,
                      (SELECT COUNT(*) FROM students s WHERE s.class_id = c.id)
               FROM classes c
               WHERE c.id = $1
               FOR UPDATE"#,
        )
        .bind(class_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Class not found")))?;

        if enrolled >= i64::from(capacity) {
            warn!(class_id = %class_id, capacity, "class is full");
            return Err(AppError::unprocessable(anyhow::anyhow!(CLASS_FULL_MESSAGE)));
        }
        Ok(())
    }
}
