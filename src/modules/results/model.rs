pub use scholaris_models::results::*;
