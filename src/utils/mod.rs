pub mod clock;
pub mod db_errors;
pub mod download;
pub mod schedule_errors;
pub mod viewer;

pub use clock::{school_now, school_today};
pub use db_errors::map_db_error;
pub use download::attachment;
pub use schedule_errors::map_schedule_error;
pub use viewer::Viewer;
