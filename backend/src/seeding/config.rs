//! Seeding configuration loaded via OrthoConfig.

use std::env;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Environment variable consulted when no database URL is configured.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration values controlling a seeding run.
///
/// Values come from `STOREFRONT_SEED_*` environment variables and
/// configuration files; command-line flags override them.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT_SEED")]
pub struct SeedingSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Seed for reproducible generation; entropy is used when absent.
    pub seed: Option<u64>,
    /// Maximum number of pooled connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending schema migrations before seeding.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl SeedingSettings {
    /// Return the configured database URL, falling back to `DATABASE_URL`.
    #[must_use]
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env::var(DATABASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
    }
}
