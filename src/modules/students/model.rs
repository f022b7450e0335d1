pub use scholaris_models::students::*;
