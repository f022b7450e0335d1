//! Transcript of records: identity block plus a per-subject average table.

use chrono::NaiveDate;

use scholaris_models::results::round_to;

use crate::error::DocumentError;
use crate::pdf::{Column, PdfWriter};
use crate::school::SchoolHeader;

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAverage {
    pub subject: String,
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub school: SchoolHeader,
    pub student_name: String,
    pub class_name: String,
    pub registration_number: String,
    pub birthday: NaiveDate,
    pub birth_place: String,
    pub personal_code: String,
    pub nationality: String,
    pub father_name: String,
    pub mother_name: String,
    pub parents_address: String,
    pub student_address: String,
    pub subjects: Vec<SubjectAverage>,
}

impl Transcript {
    /// Mean of the subject averages, or `None` with no subjects.
    pub fn general_average(&self) -> Option<f64> {
        if self.subjects.is_empty() {
            return None;
        }
        let sum: f64 = self.subjects.iter().map(|s| s.average).sum();
        Some(round_to(sum / self.subjects.len() as f64, 2))
    }

    pub fn render(&self) -> Result<Vec<u8>, DocumentError> {
        let mut pdf = PdfWriter::new();
        self.school.render(&mut pdf);
        pdf.title("TRANSCRIPT OF RECORDS");
        pdf.gap(10);

        pdf.heading("Student");
        pdf.field("Name", &self.student_name);
        pdf.field("Registration number", &self.registration_number);
        pdf.field("Class", &self.class_name);
        pdf.field("Personal code", &self.personal_code);
        pdf.field(
            "Born",
            &format!("{}, {}", self.birthday.format("%d.%m.%Y"), self.birth_place),
        );
        pdf.field("Nationality", &self.nationality);
        pdf.field("Address", &self.student_address);
        pdf.gap(6);

        pdf.heading("Parents");
        pdf.field("Father", &self.father_name);
        pdf.field("Mother", &self.mother_name);
        pdf.field("Address", &self.parents_address);
        pdf.gap(6);

        pdf.heading("Results");
        let rows: Vec<Vec<String>> = self
            .subjects
            .iter()
            .enumerate()
            .map(|(i, s)| {
                vec![
                    (i + 1).to_string(),
                    s.subject.clone(),
                    s.count.to_string(),
                    format!("{:.2}", s.average),
                ]
            })
            .collect();
        pdf.table(
            &[
                Column::left("#", 30),
                Column::left("Subject", 305),
                Column::right("Grades", 80),
                Column::right("Average", 80),
            ],
            &rows,
        );

        match self.general_average() {
            Some(average) => pdf.field("General average", &format!("{:.2}", average)),
            None => pdf.paragraph("No results recorded for the selected period."),
        }

        pdf.finish()
    }
}
