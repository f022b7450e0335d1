use axum::{
    http::header,
    response::{IntoResponse, Response},
};

pub const PDF: &str = "application/pdf";
pub const CSV: &str = "text/csv; charset=utf-8";

/// A file response the browser saves as `filename`.
pub fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        bytes,
    )
        .into_response()
}
