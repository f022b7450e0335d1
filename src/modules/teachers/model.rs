pub use scholaris_models::teachers::*;
