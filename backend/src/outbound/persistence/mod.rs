//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! This module provides the concrete storefront store backed by PostgreSQL
//! via the Diesel ORM with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapter**: the store only translates generated records into
//!   Diesel rows. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to
//!   `StoreError` variants.
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_backend::outbound::persistence::{
//!     DbPool, DieselStorefrontStore, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/shop";
//! run_pending_migrations(url).await?;
//! let store = DieselStorefrontStore::new(DbPool::new(PoolConfig::new(url)).await?);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_storefront_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_storefront_store::DieselStorefrontStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, OwnedConnection, PoolConfig, PoolError};
