//! # Scholaris Documents
//!
//! Renders school paperwork to PDF and result listings to CSV.
//!
//! - [`certificate`]: enrolment certificate
//! - [`transcript`]: transcript of records with per-subject averages
//! - [`absence_report`]: a student's absences in one month
//! - [`results_report`]: a results table with its score summary
//! - [`export`]: results as CSV
//!
//! All PDFs go through [`pdf::PdfWriter`], which uses the built-in Helvetica
//! faces and paginates automatically.

pub mod absence_report;
pub mod certificate;
pub mod error;
pub mod export;
pub mod pdf;
pub mod results_report;
pub mod school;
pub mod transcript;

pub use absence_report::{AbsenceEntry, AbsenceReport, AbsenceTotals};
pub use certificate::Certificate;
pub use error::DocumentError;
pub use export::results_csv;
pub use results_report::ResultsReport;
pub use school::SchoolHeader;
pub use transcript::{SubjectAverage, Transcript};
