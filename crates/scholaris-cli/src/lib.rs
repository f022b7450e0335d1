//! # Scholaris CLI
//!
//! Administrative commands and database seeding for development.
//!
//! ```ignore
//! use scholaris_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_classes(6).with_students_per_class(20);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
