//! # Scholaris Auth
//!
//! Roles and bearer tokens.
//!
//! - [`roles`]: the four account roles carried in every token
//! - [`claims`]: JWT claim structure
//! - [`jwt`]: token creation and verification
//!
//! ```ignore
//! use scholaris_auth::{Role, create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "jdoe", Role::Teacher, &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! assert_eq!(claims.role, Role::Teacher);
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use roles::Role;
