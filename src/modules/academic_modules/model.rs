pub use scholaris_models::academic_modules::*;
