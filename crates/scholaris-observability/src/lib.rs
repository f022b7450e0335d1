//! Scholaris observability.
//!
//! Provides:
//! - structured logging with daily-rolling files and an OpenTelemetry export
//! - Prometheus metrics, HTTP middleware and domain counters
//! - one log line per HTTP request
//!
//! Everything beyond plain console logging sits behind the `observability`
//! feature (on by default). At runtime it can be switched off with
//! `OBSERVABILITY_ENABLED=false`, in which case only console logging runs.
//!
//! ```no_run
//! use scholaris_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_app, metrics_middleware,
    track_document_generated, track_lessons_created, track_login_failure, track_login_success,
    track_schedule_conflict, track_user_created,
};

pub use basic_logging::init_basic_console_logging;

/// No-op stand-ins used when the `observability` feature is compiled out.
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Falls back to console logging.
    pub fn init_tracing() {
        super::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn track_user_created(_role: &str) {}
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_lessons_created(_kind: &str, _count: usize) {}
    pub fn track_schedule_conflict() {}
    pub fn track_document_generated(_kind: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
