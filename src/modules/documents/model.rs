pub use scholaris_models::documents::{
    AbsenceReportRequest, CertificateRequest, TranscriptRequest, month_end, parse_month,
};
