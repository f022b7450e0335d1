//! # Scholaris Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`server`]: listen addresses for the API and the metrics endpoint
//! - [`school`]: school identity printed on generated documents
//!
//! Every config has a `from_env()` constructor that falls back to
//! development defaults when a variable is missing or malformed.

pub mod cors;
pub mod jwt;
pub mod school;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use school::SchoolConfig;
pub use server::ServerConfig;

/// Reads `key` and parses it, returning `default` when absent or invalid.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
