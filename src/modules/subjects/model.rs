pub use scholaris_models::subjects::*;
