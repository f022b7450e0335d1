//! Types shared by several profiles.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "gender", rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub fn validate_blood_type(value: &str) -> Result<(), ValidationError> {
    if BLOOD_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("blood_type").with_message("Blood type is invalid".into()))
    }
}

/// Usernames are 3 to 20 characters of letters, digits, `.`, `_` or `-`.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid_chars {
        Ok(())
    } else {
        Err(ValidationError::new("username")
            .with_message("Username may only contain letters, digits, '.', '_' and '-'".into()))
    }
}

/// Parses `YYYY-MM-DD` query values; empty input means unset.
pub(crate) fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Generic `{message}` body for delete endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_uses_uppercase_wire_names() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"FEMALE\"");
        let parsed: Gender = serde_json::from_str("\"OTHER\"").unwrap();
        assert_eq!(parsed, Gender::Other);
    }

    #[test]
    fn blood_types() {
        assert!(validate_blood_type("AB-").is_ok());
        assert!(validate_blood_type("C+").is_err());
    }

    #[test]
    fn usernames() {
        assert!(validate_username("j.doe_2").is_ok());
        assert!(validate_username("j doe").is_err());
    }
}
