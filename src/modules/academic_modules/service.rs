use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::AppError;
use scholaris_models::{HolidayId, ModuleId};
use scholaris_scheduling::DateRange;

use crate::modules::academic_modules::model::{
    AcademicModule, CreateHolidayDto, CreateModuleDto, Holiday, ModuleWithHolidays,
    UpdateModuleDto,
};
use crate::utils::{map_db_error, map_schedule_error};

pub struct AcademicModuleService;

impl AcademicModuleService {
    #[instrument(skip(db))]
    pub async fn create_module(
        db: &PgPool,
        dto: CreateModuleDto,
    ) -> Result<ModuleWithHolidays, AppError> {
        DateRange::new(dto.start_date, dto.end_date).map_err(map_schedule_error)?;

        let module = sqlx::query_as::<_, AcademicModule>(
            r#"INSERT INTO academic_modules (name, start_date, end_date)
               VALUES ($1, $2, $3)
               RETURNING id, name, start_date, end_date, created_at"#,
        )
        .bind(dto.name.trim())
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        info!(module_id = %module.id, "academic module created");

        Ok(ModuleWithHolidays {
            module,
            holidays: Vec::new(),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_modules(db: &PgPool) -> Result<Vec<AcademicModule>, AppError> {
        let modules = sqlx::query_as::<_, AcademicModule>(
            r#"SELECT id, name, start_date, end_date, created_at
               FROM academic_modules
               ORDER BY start_date, name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(modules)
    }

    #[instrument(skip(db))]
    pub async fn get_module(
        db: &PgPool,
        module_id: ModuleId,
    ) -> Result<ModuleWithHolidays, AppError> {
        let module = Self::find_module(db, module_id).await?;
        let holidays = Self::fetch_holidays(db, module_id).await?;

        Ok(ModuleWithHolidays { module, holidays })
    }

    /// Existing holidays must still fit in the updated range.
    #[instrument(skip(db))]
    pub async fn update_module(
        db: &PgPool,
        module_id: ModuleId,
        dto: UpdateModuleDto,
    ) -> Result<ModuleWithHolidays, AppError> {
        let existing = Self::get_module(db, module_id).await?;

        let start_date = dto.start_date.unwrap_or(existing.module.start_date);
        let end_date = dto.end_date.unwrap_or(existing.module.end_date);
        let range = DateRange::new(start_date, end_date).map_err(map_schedule_error)?;

        if let Some(outside) = existing.holidays.iter().find(|h| !range.contains(h.date)) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Holiday '{}' on {} would fall outside the module",
                outside.name,
                outside.date
            )));
        }

        sqlx::query(
            r#"UPDATE academic_modules
               SET name = $1, start_date = $2, end_date = $3
               WHERE id = $4"#,
        )
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.module.name))
        .bind(start_date)
        .bind(end_date)
        .bind(module_id)
        .execute(db)
        .await
        .map_err(map_db_error)?;

        Self::get_module(db, module_id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_module(db: &PgPool, module_id: ModuleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM academic_modules WHERE id = $1")
            .bind(module_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Module not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_holidays(db: &PgPool, module_id: ModuleId) -> Result<Vec<Holiday>, AppError> {
        Self::find_module(db, module_id).await?;
        Self::fetch_holidays(db, module_id).await
    }

    #[instrument(skip(db))]
    pub async fn create_holiday(
        db: &PgPool,
        module_id: ModuleId,
        dto: CreateHolidayDto,
    ) -> Result<Holiday, AppError> {
        let module = Self::find_module(db, module_id).await?;
        let range = module.date_range().map_err(map_schedule_error)?;

        if !range.contains(dto.date) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Holiday must fall between {} and {}",
                range.start(),
                range.end()
            )));
        }

        let holiday = sqlx::query_as::<_, Holiday>(
            r#"INSERT INTO holidays (module_id, name, date)
               VALUES ($1, $2, $3)
               RETURNING id, module_id, name, date"#,
        )
        .bind(module_id)
        .bind(dto.name.trim())
        .bind(dto.date)
        .fetch_one(db)
        .await
        .map_err(map_db_error)?;

        Ok(holiday)
    }

    #[instrument(skip(db))]
    pub async fn delete_holiday(
        db: &PgPool,
        module_id: ModuleId,
        holiday_id: HolidayId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = $1 AND module_id = $2")
            .bind(holiday_id)
            .bind(module_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Holiday not found")));
        }
        Ok(())
    }

    async fn find_module(db: &PgPool, module_id: ModuleId) -> Result<AcademicModule, AppError> {
        sqlx::query_as::<_, AcademicModule>(
            r#"SELECT id, name, start_date, end_date, created_at
               FROM academic_modules
               WHERE id = $1"#,
        )
        .bind(module_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Module not found")))
    }

    async fn fetch_holidays(db: &PgPool, module_id: ModuleId) -> Result<Vec<Holiday>, AppError> {
        let holidays = sqlx::query_as::<_, Holiday>(
            r#"SELECT id, module_id, name, date
               FROM holidays
               WHERE module_id = $1
               ORDER BY date"#,
        )
        .bind(module_id)
        .fetch_all(db)
        .await?;

        Ok(holidays)
    }
}
