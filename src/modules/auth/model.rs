pub use scholaris_models::auth::*;
