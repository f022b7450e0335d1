pub use scholaris_models::parents::*;
