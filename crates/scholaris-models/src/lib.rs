//! # Scholaris Models
//!
//! Database rows, request DTOs, list filters and paginated responses for
//! every resource the API exposes.
//!
//! # Modules
//!
//! - [`ids`]: typed UUID newtypes
//! - [`auth`]: login payloads
//! - [`teachers`], [`students`], [`parents`]: people
//! - [`grades`], [`classes`], [`subjects`], [`academic_modules`]: catalog
//! - [`lessons`]: timetable entries, recurring creation and availability
//! - [`exams`], [`assignments`], [`results`]: assessment
//! - [`attendance`]
//! - [`events`]: events and announcements
//! - [`documents`]: certificate, transcript and absence report requests
//!
//! ```ignore
//! use scholaris_models::results::ScoreSummary;
//!
//! let summary = ScoreSummary::compute(&[90, 55, 70]).unwrap();
//! assert_eq!(summary.average, 71.67);
//! ```

pub mod academic_modules;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod documents;
pub mod events;
pub mod exams;
pub mod grades;
pub mod ids;
pub mod lessons;
pub mod parents;
pub mod results;
pub mod students;
pub mod subjects;
pub mod teachers;

pub use common::{Gender, MessageResponse};
pub use ids::*;
