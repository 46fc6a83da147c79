//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed storefront store using Diesel ORM
//! - **in_memory**: process-local store used for dry runs and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

mod in_memory;
pub mod persistence;

pub use in_memory::{InMemoryStorefrontStore, StoreCalls};
