//! Port abstraction for the storefront store.
//!
//! Seeding needs only a narrow slice of the store: identifier listings to
//! wire foreign keys, and an insert-only transaction to apply a run
//! atomically. Adapters own the transaction-scoped resource; dropping a
//! transaction without committing must leave nothing applied.

use std::collections::BTreeSet;

use async_trait::async_trait;
use storefront_data::{EntityKind, IdSet, OrderLineKey, RecordBatch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by storefront store adapters.
    pub enum StoreError {
        /// The store could not be reached or the connection was lost.
        Connection { message: String } => "store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
        /// A write violated a key, uniqueness or check constraint.
        Constraint { message: String } => "store constraint violated: {message}",
    }
}

/// Read access and transaction factory for the storefront store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorefrontStore: Send + Sync {
    /// Returns every identifier of `kind` currently committed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] for kinds without a single-column
    /// identifier, or when the listing fails.
    async fn list_ids(&self, kind: EntityKind) -> Result<IdSet, StoreError>;

    /// Returns every committed `(catalog item, order)` pair.
    async fn list_order_lines(&self) -> Result<BTreeSet<OrderLineKey>, StoreError>;

    /// Opens a transaction that owns its resources until committed or
    /// rolled back.
    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;
}

/// An open, insert-only store transaction.
///
/// A failed [`StoreTransaction::commit`] leaves nothing applied; callers do
/// not roll back after it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreTransaction: Send {
    /// Inserts every record of `batch`.
    async fn insert_batch(&mut self, batch: &RecordBatch) -> Result<(), StoreError>;

    /// Makes every inserted batch visible to readers.
    async fn commit(&mut self) -> Result<(), StoreError>;

    /// Discards every inserted batch.
    async fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Returns the error raised when listing identifiers of a keyless kind.
#[must_use]
pub fn keyless_kind_error(kind: EntityKind) -> StoreError {
    StoreError::query(format!("{kind} records have no single-column identifier"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for store error formatting.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(StoreError::connection("refused"), "store connection failed: refused")]
    #[case(StoreError::query("timeout"), "store query failed: timeout")]
    #[case(StoreError::constraint("duplicate key"), "store constraint violated: duplicate key")]
    fn store_errors_format_their_cause(#[case] error: StoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn keyless_listing_names_the_kind() {
        let error = keyless_kind_error(EntityKind::OrderLine);
        assert_eq!(
            error.to_string(),
            "store query failed: OrderLine records have no single-column identifier"
        );
    }
}
