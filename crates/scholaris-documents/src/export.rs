//! CSV export of result listings.

use scholaris_models::results::ResultEntry;

use crate::error::DocumentError;

pub const RESULTS_CSV_HEADER: [&str; 7] =
    ["title", "student", "teacher", "subject", "class", "date", "score"];

pub fn results_csv(results: &[ResultEntry]) -> Result<Vec<u8>, DocumentError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(RESULTS_CSV_HEADER)?;

    for r in results {
        wtr.write_record([
            r.title.clone(),
            format!("{} {}", r.student_name, r.student_surname),
            format!("{} {}", r.teacher_name, r.teacher_surname),
            r.subject_name.clone(),
            r.class_name.clone(),
            r.date.format("%Y-%m-%d %H:%M").to_string(),
            r.score.to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| DocumentError::Io(e.into_error()))
}
