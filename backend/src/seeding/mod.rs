//! Runtime settings for the storefront seeding tool.

mod config;

pub use config::{DATABASE_URL_ENV, SeedingSettings};
