pub use scholaris_models::attendance::*;
