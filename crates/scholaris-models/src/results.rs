//! Exam and assignment results, their filters and the score summary.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use scholaris_core::serde::{
    deserialize_optional_trimmed, deserialize_optional_uuid, deserialize_uuid_list,
};
use scholaris_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::ids::{AssignmentId, ClassId, ExamId, ResultId, StudentId, SubjectId, TeacherId};

/// Scores at or above this mark count as passed.
pub const PASS_MARK: i32 = 60;

pub const NO_GRADES_MESSAGE: &str = "There are no grades for calculating the average.";

/// A result joined with its exam or assignment, student, teacher, subject and class.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResultEntry {
    pub id: ResultId,
    pub score: i32,
    pub exam_id: Option<ExamId>,
    pub assignment_id: Option<AssignmentId>,
    /// Title of the exam or assignment
    pub title: String,
    /// Exam start or assignment start date
    pub date: NaiveDateTime,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_surname: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub teacher_surname: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub class_id: ClassId,
    pub class_name: String,
    pub created_at: DateTime<Utc>,
}

impl ResultEntry {
    pub fn kind(&self) -> &'static str {
        if self.exam_id.is_some() {
            "exam"
        } else {
            "assignment"
        }
    }
}

fn validate_source(dto: &CreateResultDto) -> Result<(), ValidationError> {
    match (dto.exam_id, dto.assignment_id) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(ValidationError::new("source")
            .with_message("Provide either an exam or an assignment".into())),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_source", skip_on_field_errors = false))]
pub struct CreateResultDto {
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: i32,
    pub exam_id: Option<ExamId>,
    pub assignment_id: Option<AssignmentId>,
    pub student_id: StudentId,
}

/// Changing the source replaces both exam and assignment link.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResultDto {
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: Option<i32>,
    pub exam_id: Option<ExamId>,
    pub assignment_id: Option<AssignmentId>,
    pub student_id: Option<StudentId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResultSort {
    /// Title A-Z
    Asc,
    /// Title Z-A
    Desc,
    DateAsc,
    #[default]
    DateDesc,
    ScoreAsc,
    ScoreDesc,
}

impl ResultSort {
    /// ORDER BY clause for the result listing query.
    pub fn order_by(self) -> &'static str {
        match self {
            ResultSort::Asc => "title ASC, date DESC",
            ResultSort::Desc => "title DESC, date DESC",
            ResultSort::DateAsc => "date ASC, title ASC",
            ResultSort::DateDesc => "date DESC, title ASC",
            ResultSort::ScoreAsc => "score ASC, date DESC",
            ResultSort::ScoreDesc => "score DESC, date DESC",
        }
    }
}

/// Id-list filters take comma-separated values, e.g. `student_id=a,b`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultFilterParams {
    #[serde(default, deserialize_with = "deserialize_uuid_list")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub student_id: Vec<Uuid>,
    #[serde(default, deserialize_with = "deserialize_uuid_list")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub teacher_id: Vec<Uuid>,
    #[serde(default, deserialize_with = "deserialize_uuid_list")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub subject_id: Vec<Uuid>,
    #[serde(default, deserialize_with = "deserialize_uuid_list")]
    #[param(value_type = Option<String>)]
    #[schema(value_type = Option<String>)]
    pub class_id: Vec<Uuid>,
    /// Exact exam or assignment title
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub title: Option<String>,
    /// Matches title, subject, student, teacher or class name
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub search: Option<String>,
    /// Only results dated within this module
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub module_id: Option<Uuid>,
    #[serde(default)]
    pub sort: ResultSort,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultListParams {
    #[serde(flatten)]
    pub filters: ResultFilterParams,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("csv"),
            ExportFormat::Pdf => f.write_str("pdf"),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(flatten)]
    pub filters: ResultFilterParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResultsResponse {
    pub data: Vec<ResultEntry>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreSummary {
    pub count: usize,
    /// Mean score rounded to two decimals
    pub average: f64,
    pub min: i32,
    pub max: i32,
    /// Percentage of scores at or above the pass mark, rounded
    pub pass_rate: u32,
}

impl ScoreSummary {
    /// Returns `None` when there are no scores.
    pub fn compute(scores: &[i32]) -> Option<Self> {
        let min = *scores.iter().min()?;
        let max = *scores.iter().max()?;
        let count = scores.len();
        let sum: i64 = scores.iter().map(|s| i64::from(*s)).sum();
        let passed = scores.iter().filter(|s| **s >= PASS_MARK).count();

        Some(Self {
            count,
            average: round_to(sum as f64 / count as f64, 2),
            min,
            max,
            pass_rate: (passed as f64 * 100.0 / count as f64).round() as u32,
        })
    }
}

/// Rounds half away from zero to `precision` decimals.
pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResultSummaryResponse {
    pub summary: Option<ScoreSummary>,
    /// Set when there is nothing to summarise
    pub message: Option<String>,
}

impl ResultSummaryResponse {
    pub fn from_scores(scores: &[i32]) -> Self {
        match ScoreSummary::compute(scores) {
            Some(summary) => Self {
                summary: Some(summary),
                message: None,
            },
            None => Self {
                summary: None,
                message: Some(NO_GRADES_MESSAGE.to_string()),
            },
        }
    }
}
