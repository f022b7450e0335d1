pub use scholaris_models::grades::*;
