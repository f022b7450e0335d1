pub use scholaris_models::exams::*;
