use std::env;

/// Identity of the school as printed on certificates, transcripts and reports.
#[derive(Clone, Debug)]
pub struct SchoolConfig {
    pub name: String,
    pub address: String,
    /// Fiscal identification code shown on transcripts.
    pub cif: String,
}

impl SchoolConfig {
    pub fn from_env() -> Self {
        Self {
            name: env::var("SCHOOL_NAME").unwrap_or_else(|_| "Scholaris High School".to_string()),
            address: env::var("SCHOOL_ADDRESS").unwrap_or_else(|_| "1 School Street".to_string()),
            cif: env::var("SCHOOL_CIF").unwrap_or_else(|_| "00000000".to_string()),
        }
    }
}
