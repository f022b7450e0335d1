//! Request bodies for generated school documents.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::SubjectId;

fn validate_school_years(dto: &CertificateRequest) -> Result<(), ValidationError> {
    if dto.school_year_end != dto.school_year_start + 1 {
        return Err(ValidationError::new("school_year")
            .with_message("School year must span two consecutive years".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_school_years", skip_on_field_errors = false))]
pub struct CertificateRequest {
    /// Registry number of the certificate
    #[validate(length(min = 1, max = 20, message = "Number is required!"))]
    pub number: String,
    /// What the certificate is issued for
    #[validate(length(min = 1, max = 200, message = "Purpose is required!"))]
    pub purpose: String,
    #[validate(range(min = 2000, max = 2100))]
    pub school_year_start: i32,
    #[validate(range(min = 2000, max = 2100))]
    pub school_year_end: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TranscriptRequest {
    #[validate(length(min = 1, max = 20, message = "CIF is required!"))]
    pub cif: String,
    #[validate(length(equal = 13, message = "Personal code must have 13 digits"))]
    pub personal_code: String,
    #[validate(length(min = 1, max = 50, message = "Nationality is required!"))]
    pub nationality: String,
    #[validate(length(min = 1, max = 100, message = "Birth place is required!"))]
    pub birth_place: String,
    #[validate(length(min = 1, max = 100, message = "Father's name is required!"))]
    pub father_name: String,
    #[validate(length(min = 1, max = 100, message = "Mother's name is required!"))]
    pub mother_name: String,
    #[validate(length(min = 1, max = 200, message = "Parents' address is required!"))]
    pub parents_address: String,
    /// Limit the table to these subjects
    #[serde(default)]
    pub subject_ids: Vec<SubjectId>,
    /// Only results dated on or after this day
    pub from: Option<NaiveDate>,
    /// Only results dated on or before this day
    pub to: Option<NaiveDate>,
}

fn validate_month(value: &str) -> Result<(), ValidationError> {
    parse_month(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("month").with_message("Month must be YYYY-MM".into()))
}

/// First day of a `YYYY-MM` month.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()
}

/// Last day of the month containing `first`.
pub fn month_end(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AbsenceReportRequest {
    #[validate(custom(function = "validate_month"))]
    #[schema(example = "2025-10")]
    pub month: String,
}
