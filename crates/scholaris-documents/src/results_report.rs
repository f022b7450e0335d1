//! Results report: a filtered results table followed by its score summary.

use chrono::NaiveDate;

use scholaris_models::results::{NO_GRADES_MESSAGE, ResultEntry, ScoreSummary};

use crate::error::DocumentError;
use crate::pdf::{Column, PdfWriter};
use crate::school::SchoolHeader;

pub struct ResultsReport<'a> {
    pub school: SchoolHeader,
    pub generated_on: NaiveDate,
    pub results: &'a [ResultEntry],
}

impl ResultsReport<'_> {
    pub fn summary(&self) -> Option<ScoreSummary> {
        let scores: Vec<i32> = self.results.iter().map(|r| r.score).collect();
        ScoreSummary::compute(&scores)
    }

    pub fn render(&self) -> Result<Vec<u8>, DocumentError> {
        let mut pdf = PdfWriter::new();
        self.school.render(&mut pdf);
        pdf.title("STUDENT RESULTS REPORT");
        pdf.centered(
            &format!("Generated on {}", self.generated_on.format("%d.%m.%Y")),
            10,
        );
        pdf.gap(10);

        let rows: Vec<Vec<String>> = self
            .results
            .iter()
            .map(|r| {
                vec![
                    r.title.clone(),
                    format!("{} {}", r.student_name, r.student_surname),
                    r.subject_name.clone(),
                    r.class_name.clone(),
                    r.date.format("%d.%m.%Y").to_string(),
                    r.score.to_string(),
                ]
            })
            .collect();
        pdf.table(
            &[
                Column::left("Title", 130),
                Column::left("Student", 120),
                Column::left("Subject", 100),
                Column::left("Class", 50),
                Column::left("Date", 60),
                Column::right("Score", 35),
            ],
            &rows,
        );

        pdf.heading("Summary");
        match self.summary() {
            Some(summary) => {
                pdf.field("Results", &summary.count.to_string());
                pdf.field("Average", &format!("{:.2}", summary.average));
                pdf.field("Highest", &summary.max.to_string());
                pdf.field("Lowest", &summary.min.to_string());
                pdf.field("Pass rate", &format!("{}%", summary.pass_rate));
            }
            None => pdf.paragraph(NO_GRADES_MESSAGE),
        }

        pdf.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::result;

    #[test]
    fn renders_with_summary() {
        let results = vec![result("Test 1", 90), result("Test 2", 50)];
        let report = ResultsReport {
            school: SchoolHeader::default(),
            generated_on: NaiveDate::from_ymd_opt(2025, 10, 16).unwrap(),
            results: &results,
        };
        let summary = report.summary().unwrap();
        assert_eq!(summary.average, 70.0);
        assert_eq!(summary.pass_rate, 50);
        assert!(report.render().unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn renders_without_results() {
        let report = ResultsReport {
            school: SchoolHeader::default(),
            generated_on: NaiveDate::from_ymd_opt(2025, 10, 16).unwrap(),
            results: &[],
        };
        assert!(report.summary().is_none());
        assert!(report.render().unwrap().starts_with(b"%PDF-"));
    }
}
