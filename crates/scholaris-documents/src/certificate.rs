//! Student certificate ("adeverință"): confirms enrolment for a school year.

use chrono::NaiveDate;

use crate::error::DocumentError;
use crate::pdf::PdfWriter;
use crate::school::SchoolHeader;

#[derive(Debug, Clone)]
pub struct Certificate {
    pub school: SchoolHeader,
    pub number: String,
    pub issued_on: NaiveDate,
    pub student_name: String,
    pub class_name: String,
    pub registration_number: String,
    pub school_year_start: i32,
    pub school_year_end: i32,
    pub purpose: String,
}

impl Certificate {
    pub fn render(&self) -> Result<Vec<u8>, DocumentError> {
        let mut pdf = PdfWriter::new();
        self.school.render(&mut pdf);

        pdf.field("No.", &self.number);
        pdf.field("Date", &self.issued_on.format("%d.%m.%Y").to_string());
        pdf.gap(20);
        pdf.title("CERTIFICATE");
        pdf.gap(20);

        pdf.paragraph(&format!(
            "This is to certify that {}, registration number {}, is enrolled in class {} \
             of {} during the {}-{} school year.",
            self.student_name,
            self.registration_number,
            self.class_name,
            self.school.name,
            self.school_year_start,
            self.school_year_end,
        ));
        pdf.gap(6);
        pdf.paragraph(&format!(
            "This certificate is issued to serve as proof for: {}.",
            self.purpose.trim_end_matches('.')
        ));
        pdf.gap(60);
        pdf.field("Principal", "____________________");
        pdf.gap(10);
        pdf.field("Secretary", "____________________");

        pdf.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_certificate() {
        let certificate = Certificate {
            school: SchoolHeader {
                name: "Școala Gimnazială Nr. 1".to_string(),
                address: "Str. Școlii 1, Iași".to_string(),
                cif: "12345678".to_string(),
            },
            number: "125".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2025, 10, 16).unwrap(),
            student_name: "Ion Ionescu".to_string(),
            class_name: "5A".to_string(),
            registration_number: "ABCDEF12".to_string(),
            school_year_start: 2025,
            school_year_end: 2026,
            purpose: "Bus pass".to_string(),
        };
        let bytes = certificate.render().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
