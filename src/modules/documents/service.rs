use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument};

use scholaris_core::AppError;
use scholaris_documents::{
    AbsenceEntry, AbsenceReport, Certificate, SchoolHeader, SubjectAverage, Transcript,
};
use scholaris_models::StudentId;
use scholaris_models::results::round_to;
use scholaris_observability::track_document_generated;

use crate::modules::documents::model::{
    AbsenceReportRequest, CertificateRequest, TranscriptRequest, month_end, parse_month,
};
use crate::modules::students::service::StudentService;
use crate::utils::school_today;

/// A rendered PDF and the name it is downloaded under.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl GeneratedDocument {
    fn new(kind: &str, registration_number: &str, bytes: Vec<u8>) -> Self {
        track_document_generated(kind);
        info!(kind, size = bytes.len(), "document generated");

        Self {
            filename: format!("{}-{}.pdf", kind.replace('_', "-"), registration_number),
            bytes,
        }
    }
}

pub struct DocumentService;

impl DocumentService {
    #[instrument(skip(db, school))]
    pub async fn certificate(
        db: &PgPool,
        school: SchoolHeader,
        student_id: StudentId,
        request: CertificateRequest,
    ) -> Result<GeneratedDocument, AppError> {
        let student = StudentService::get_student(db, student_id).await?;
        let registration_number = student.registration_number();

        let bytes = Certificate {
            school,
            number: request.number.trim().to_string(),
            issued_on: school_today(),
            student_name: student.full_name(),
            class_name: student.class_name,
            registration_number: registration_number.clone(),
            school_year_start: request.school_year_start,
            school_year_end: request.school_year_end,
            purpose: request.purpose.trim().to_string(),
        }
        .render()?;

        Ok(GeneratedDocument::new(
            "certificate",
            &registration_number,
            bytes,
        ))
    }

    #[instrument(skip(db, school))]
    pub async fn transcript(
        db: &PgPool,
        school: SchoolHeader,
        student_id: StudentId,
        request: TranscriptRequest,
    ) -> Result<GeneratedDocument, AppError> {
        if let (Some(from), Some(to)) = (request.from, request.to) {
            if to < from {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "The end of the period cannot be before its start"
                )));
            }
        }

        let student = StudentService::get_student(db, student_id).await?;
        let registration_number = student.registration_number();
        let subjects = Self::subject_averages(db, student_id, &request).await?;

        let bytes = Transcript {
            school: SchoolHeader {
                cif: request.cif.trim().to_string(),
                ..school
            },
            student_name: student.full_name(),
            class_name: student.class_name,
            registration_number: registration_number.clone(),
            birthday: student.birthday,
            birth_place: request.birth_place,
            personal_code: request.personal_code,
            nationality: request.nationality,
            father_name: request.father_name,
            mother_name: request.mother_name,
            parents_address: request.parents_address,
            student_address: student.address,
            subjects,
        }
        .render()?;

        Ok(GeneratedDocument::new(
            "transcript",
            &registration_number,
            bytes,
        ))
    }

    #[instrument(skip(db, school))]
    pub async fn absence_report(
        db: &PgPool,
        school: SchoolHeader,
        student_id: StudentId,
        request: AbsenceReportRequest,
    ) -> Result<GeneratedDocument, AppError> {
        let month = parse_month(&request.month)
            .ok_or_else(|| AppError::unprocessable(anyhow::anyhow!("Month must be YYYY-MM")))?;
        let last_day = month_end(month)
            .ok_or_else(|| AppError::unprocessable(anyhow::anyhow!("Month out of range")))?;

        let student = StudentService::get_student(db, student_id).await?;
        let registration_number = student.registration_number();

        let entries = sqlx::query_as::<_, (NaiveDate, String, bool)>(
            r#"SELECT att.date, l.name, att.excused
               FROM attendances att
               JOIN lessons l ON l.id = att.lesson_id
               WHERE att.student_id = $1
                 AND att.present = false
                 AND att.date BETWEEN $2 AND $3
               ORDER BY att.date ASC, l.start_time ASC"#,
        )
        .bind(student_id)
        .bind(month)
        .bind(last_day)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|(date, lesson, excused)| AbsenceEntry {
            date,
            lesson,
            excused,
        })
        .collect();

        let bytes = AbsenceReport {
            school,
            student_name: student.full_name(),
            class_name: student.class_name,
            month,
            entries,
        }
        .render()?;

        Ok(GeneratedDocument::new(
            "absence_report",
            &registration_number,
            bytes,
        ))
    }

    async fn subject_averages(
        db: &PgPool,
        student_id: StudentId,
        request: &TranscriptRequest,
    ) -> Result<Vec<SubjectAverage>, AppError> {
        let rows = sqlx::query_as::<_, (String, f64, i64)>(
            r#"SELECT s.name, AVG(r.score)::float8, COUNT(*)
               FROM results r
               LEFT JOIN exams e ON e.id = r.exam_id
               LEFT JOIN assignments a ON a.id = r.assignment_id
               JOIN lessons l ON l.id = COALESCE(e.lesson_id, a.lesson_id)
               JOIN subjects s ON s.id = l.subject_id
               WHERE r.student_id = $1
                 AND (cardinality($2::uuid[]) = 0 OR s.id = ANY($2))
                 AND ($3::date IS NULL OR COALESCE(e.start_time, a.start_date)::date >= $3)
                 AND ($4::date IS NULL OR COALESCE(e.start_time, a.start_date)::date <= $4)
               GROUP BY s.name
               ORDER BY s.name ASC"#,
        )
        .bind(student_id)
        .bind(&request.subject_ids)
        .bind(request.from)
        .bind(request.to)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(subject, average, count)| SubjectAverage {
                subject,
                average: round_to(average, 2),
                count,
            })
            .collect())
    }
}
