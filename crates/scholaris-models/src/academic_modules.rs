//! Academic modules (teaching periods) and their holidays.

use chrono::{DateTime, NaiveDate, Utc};
use scholaris_scheduling::{DateRange, HolidayCalendar, ScheduleError};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{HolidayId, ModuleId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicModule {
    pub id: ModuleId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl AcademicModule {
    pub fn date_range(&self) -> Result<DateRange, ScheduleError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Holiday {
    pub id: HolidayId,
    pub module_id: ModuleId,
    pub name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModuleWithHolidays {
    #[serde(flatten)]
    pub module: AcademicModule,
    pub holidays: Vec<Holiday>,
}

impl ModuleWithHolidays {
    pub fn calendar(&self) -> HolidayCalendar {
        self.holidays.iter().map(|h| h.date).collect()
    }
}

fn validate_module_range(dto: &CreateModuleDto) -> Result<(), ValidationError> {
    if dto.end_date < dto.start_date {
        return Err(ValidationError::new("date_range")
            .with_message("End date must not be before start date".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_module_range", skip_on_field_errors = false))]
pub struct CreateModuleDto {
    #[validate(length(min = 1, max = 100, message = "Module name is required!"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The resulting range is checked against the stored one in the service.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateModuleDto {
    #[validate(length(min = 1, max = 100, message = "Module name is required!"))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHolidayDto {
    #[validate(length(min = 1, max = 100, message = "Holiday name is required!"))]
    pub name: String,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_module() {
        let dto = CreateModuleDto {
            name: "Module 1".to_string(),
            start_date: date(10, 1),
            end_date: date(9, 1),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn calendar_contains_holiday_dates() {
        let module = AcademicModule {
            id: ModuleId::new(),
            name: "Module 1".to_string(),
            start_date: date(9, 8),
            end_date: date(10, 24),
            created_at: Utc::now(),
        };
        let holiday = Holiday {
            id: HolidayId::new(),
            module_id: module.id,
            name: "Ziua Educației".to_string(),
            date: date(10, 5),
        };
        let with = ModuleWithHolidays {
            module,
            holidays: vec![holiday],
        };
        assert!(with.calendar().contains(date(10, 5)));
        assert!(with.module.date_range().is_ok());
    }
}
