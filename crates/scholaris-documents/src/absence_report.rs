//! Monthly absence report for one student.

use chrono::NaiveDate;

use crate::error::DocumentError;
use crate::pdf::{Column, PdfWriter};
use crate::school::SchoolHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceEntry {
    pub date: NaiveDate,
    pub lesson: String,
    pub excused: bool,
}

impl AbsenceEntry {
    pub fn status(&self) -> &'static str {
        if self.excused { "excused" } else { "unexcused" }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsenceTotals {
    pub excused: usize,
    pub unexcused: usize,
    pub total: usize,
}

impl AbsenceTotals {
    pub fn from_entries(entries: &[AbsenceEntry]) -> Self {
        let excused = entries.iter().filter(|e| e.excused).count();
        Self {
            excused,
            unexcused: entries.len() - excused,
            total: entries.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AbsenceReport {
    pub school: SchoolHeader,
    pub student_name: String,
    pub class_name: String,
    /// First day of the reported month
    pub month: NaiveDate,
    pub entries: Vec<AbsenceEntry>,
}

impl AbsenceReport {
    pub fn totals(&self) -> AbsenceTotals {
        AbsenceTotals::from_entries(&self.entries)
    }

    pub fn render(&self) -> Result<Vec<u8>, DocumentError> {
        let mut pdf = PdfWriter::new();
        self.school.render(&mut pdf);
        pdf.title("ABSENCE REPORT");
        pdf.centered(&self.month.format("%B %Y").to_string(), 12);
        pdf.gap(10);

        pdf.field("Student", &self.student_name);
        pdf.field("Class", &self.class_name);
        pdf.gap(6);

        if self.entries.is_empty() {
            pdf.paragraph("No absences were recorded this month.");
        } else {
            let rows: Vec<Vec<String>> = self
                .entries
                .iter()
                .map(|e| {
                    vec![
                        e.date.format("%d.%m.%Y").to_string(),
                        e.lesson.clone(),
                        e.status().to_string(),
                    ]
                })
                .collect();
            pdf.table(
                &[
                    Column::left("Date", 90),
                    Column::left("Lesson", 305),
                    Column::left("Status", 100),
                ],
                &rows,
            );
        }

        let totals = self.totals();
        pdf.heading("Totals");
        pdf.field("Excused", &totals.excused.to_string());
        pdf.field("Unexcused", &totals.unexcused.to_string());
        pdf.field("Total", &totals.total.to_string());

        pdf.finish()
    }
}
