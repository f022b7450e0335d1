//! Maps constraint violations to client errors.

use scholaris_core::AppError;

pub const DUPLICATE_MESSAGE: &str = "This record already exists (duplicate).";
pub const USERNAME_TAKEN_MESSAGE: &str = "The username is already taken.";
pub const REFERENCE_MESSAGE: &str = "A referenced record does not exist or is still in use.";

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Unique violations become `409`, foreign-key and check violations `400`,
/// anything else `500`.
pub fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = if db_err.constraint() == Some(USERNAME_CONSTRAINT) {
                USERNAME_TAKEN_MESSAGE
            } else {
                DUPLICATE_MESSAGE
            };
            return AppError::conflict(anyhow::anyhow!(message));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow::anyhow!(REFERENCE_MESSAGE));
        }
        if db_err.is_check_violation() {
            return AppError::bad_request(anyhow::anyhow!(
                "The record violates a data constraint."
            ));
        }
    }
    AppError::from(e)
}
