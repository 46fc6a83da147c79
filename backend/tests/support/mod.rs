//! Shared helpers for backend integration tests that need PostgreSQL.
//!
//! Suites that depend on the embedded cluster can be skipped in environments
//! where it cannot start. `SKIP_TEST_CLUSTER` controls that policy so every
//! suite behaves the same way.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

/// Returns true when `SKIP_TEST_CLUSTER` is set to "1", "true" or "yes"
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns
/// `None`. Otherwise panics so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Creates an empty database on the shared embedded cluster.
///
/// The database carries no schema; callers apply migrations themselves.
pub fn empty_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let name = format!("storefront_test_{}", uuid::Uuid::new_v4().simple());
    cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))
}
