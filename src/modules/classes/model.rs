pub use scholaris_models::classes::*;
