pub use scholaris_models::lessons::*;
