pub use scholaris_models::assignments::*;
pub use scholaris_models::exams::AssessmentFilterParams;
