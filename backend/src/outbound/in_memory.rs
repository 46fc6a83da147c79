//! In-memory storefront store.
//!
//! Backs dry runs and behaviour tests. Transactions stage into a private copy
//! of the committed tables and swap it in on commit, so an abandoned or
//! failed transaction never leaks rows. The store enforces the same key,
//! uniqueness and foreign-key rules as the PostgreSQL schema, and supports
//! fault injection for rollback tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use storefront_data::{EntityKind, IdSet, OrderLineKey, RecordBatch};
use uuid::Uuid;

use crate::domain::ports::{StoreError, StoreTransaction, StorefrontStore, keyless_kind_error};

/// Ratings accepted by the reviews table.
const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Number of calls made against an [`InMemoryStorefrontStore`] and its
/// transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `list_ids` calls.
    pub list_ids: usize,
    /// `list_order_lines` calls.
    pub list_order_lines: usize,
    /// `begin_transaction` calls.
    pub begin_transaction: usize,
    /// `insert_batch` calls.
    pub insert_batch: usize,
    /// `commit` calls.
    pub commit: usize,
    /// `rollback` calls.
    pub rollback: usize,
}

impl StoreCalls {
    /// Total calls across every operation.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.list_ids
            .saturating_add(self.list_order_lines)
            .saturating_add(self.begin_transaction)
            .saturating_add(self.insert_batch)
            .saturating_add(self.commit)
            .saturating_add(self.rollback)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    /// One-based index of the insert that fails within each transaction.
    insert_failure_at: Option<usize>,
    fail_commit: bool,
}

/// Committed or staged rows, reduced to the keys the constraints need.
#[derive(Debug, Clone, Default)]
struct Tables {
    ids: BTreeMap<EntityKind, IdSet>,
    order_lines: BTreeSet<OrderLineKey>,
    addressed_customers: IdSet,
    shipped_addresses: IdSet,
}

impl Tables {
    fn ids(&self, kind: EntityKind) -> IdSet {
        self.ids.get(&kind).cloned().unwrap_or_default()
    }

    fn contains(&self, kind: EntityKind, id: Uuid) -> bool {
        self.ids.get(&kind).is_some_and(|ids| ids.contains(&id))
    }

    fn require(&self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        if self.contains(kind, id) {
            Ok(())
        } else {
            Err(StoreError::constraint(format!("{kind} {id} is not present")))
        }
    }

    fn add(&mut self, kind: EntityKind, id: Uuid) -> Result<(), StoreError> {
        if self.ids.entry(kind).or_default().insert(id) {
            Ok(())
        } else {
            Err(StoreError::constraint(format!("duplicate {kind} id {id}")))
        }
    }

    fn insert(&mut self, batch: &RecordBatch) -> Result<(), StoreError> {
        match batch {
            RecordBatch::Customers(records) => {
                for record in records {
                    self.add(EntityKind::Customer, record.id)?;
                }
            }
            RecordBatch::Addresses(records) => {
                for record in records {
                    self.require(EntityKind::Customer, record.customer_id)?;
                    if !self.addressed_customers.insert(record.customer_id) {
                        return Err(StoreError::constraint(format!(
                            "Customer {} already has an Address",
                            record.customer_id
                        )));
                    }
                    self.add(EntityKind::Address, record.id)?;
                }
            }
            RecordBatch::Categories(records) => {
                for record in records {
                    self.add(EntityKind::Category, record.id)?;
                }
            }
            RecordBatch::CatalogItems(records) => {
                for record in records {
                    self.require(EntityKind::Category, record.category_id)?;
                    self.add(EntityKind::CatalogItem, record.id)?;
                }
            }
            RecordBatch::ShippingAddresses(records) => {
                for record in records {
                    self.add(EntityKind::ShippingAddress, record.id)?;
                }
            }
            RecordBatch::Orders(records) => {
                for record in records {
                    if let Some(customer_id) = record.customer_id {
                        self.require(EntityKind::Customer, customer_id)?;
                    }
                    self.require(EntityKind::ShippingAddress, record.shipping_address_id)?;
                    if !self.shipped_addresses.insert(record.shipping_address_id) {
                        return Err(StoreError::constraint(format!(
                            "ShippingAddress {} already belongs to an Order",
                            record.shipping_address_id
                        )));
                    }
                    self.add(EntityKind::Order, record.id)?;
                }
            }
            RecordBatch::OrderLines(records) => {
                for record in records {
                    self.require(EntityKind::CatalogItem, record.catalog_item_id)?;
                    self.require(EntityKind::Order, record.order_id)?;
                    if !self.order_lines.insert(record.key()) {
                        return Err(StoreError::constraint(format!(
                            "duplicate OrderLine ({}, {})",
                            record.catalog_item_id, record.order_id
                        )));
                    }
                }
            }
            RecordBatch::Reviews(records) => {
                for record in records {
                    self.require(EntityKind::Customer, record.customer_id)?;
                    self.require(EntityKind::CatalogItem, record.catalog_item_id)?;
                    if !RATING_RANGE.contains(&record.rating) {
                        return Err(StoreError::constraint(format!(
                            "rating {} is outside 1..=5",
                            record.rating
                        )));
                    }
                    self.add(EntityKind::Review, record.id)?;
                }
            }
            RecordBatch::Reports(records) => {
                for record in records {
                    self.require(EntityKind::Customer, record.customer_id)?;
                    self.add(EntityKind::Report, record.id)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Shared {
    committed: Mutex<Tables>,
    calls: Mutex<StoreCalls>,
}

impl Shared {
    fn committed(&self) -> MutexGuard<'_, Tables> {
        self.committed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: impl FnOnce(&mut StoreCalls)) {
        call(&mut self.calls.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn calls(&self) -> StoreCalls {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-local implementation of [`StorefrontStore`].
///
/// Concurrent transactions are not isolated from each other: the last commit
/// wins. Callers serialise runs, as the seeding CLI does.
///
/// # Examples
///
/// ```
/// use storefront_backend::outbound::InMemoryStorefrontStore;
/// use storefront_data::EntityKind;
///
/// let store = InMemoryStorefrontStore::new().with_commit_failure();
/// assert!(store.committed_ids(EntityKind::Customer).is_empty());
/// assert_eq!(store.calls().total(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefrontStore {
    shared: Arc<Shared>,
    faults: Faults,
}

impl InMemoryStorefrontStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose committed state already holds `batches`.
    ///
    /// Preloading is not counted as store calls.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when a batch violates a key,
    /// uniqueness or foreign-key rule.
    pub fn with_committed(batches: &[RecordBatch]) -> Result<Self, StoreError> {
        let mut tables = Tables::default();
        for batch in batches {
            tables.insert(batch)?;
        }
        let store = Self::new();
        *store.shared.committed() = tables;
        Ok(store)
    }

    /// Fail the `nth` (one-based) insert of every transaction.
    #[must_use]
    pub const fn with_insert_failure(mut self, nth: usize) -> Self {
        self.faults.insert_failure_at = Some(nth);
        self
    }

    /// Fail every commit. Nothing from the failed transaction is applied.
    #[must_use]
    pub const fn with_commit_failure(mut self) -> Self {
        self.faults.fail_commit = true;
        self
    }

    /// Committed identifiers of `kind`. Order lines have none.
    #[must_use]
    pub fn committed_ids(&self, kind: EntityKind) -> IdSet {
        self.shared.committed().ids(kind)
    }

    /// Committed `(catalog item, order)` pairs.
    #[must_use]
    pub fn committed_order_lines(&self) -> BTreeSet<OrderLineKey> {
        self.shared.committed().order_lines.clone()
    }

    /// Calls made so far against the store and its transactions.
    #[must_use]
    pub fn calls(&self) -> StoreCalls {
        self.shared.calls()
    }
}

#[async_trait]
impl StorefrontStore for InMemoryStorefrontStore {
    async fn list_ids(&self, kind: EntityKind) -> Result<IdSet, StoreError> {
        self.shared.record(|calls| calls.list_ids += 1);
        if !kind.has_identifier() {
            return Err(keyless_kind_error(kind));
        }
        Ok(self.committed_ids(kind))
    }

    async fn list_order_lines(&self) -> Result<BTreeSet<OrderLineKey>, StoreError> {
        self.shared.record(|calls| calls.list_order_lines += 1);
        Ok(self.committed_order_lines())
    }

    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        self.shared.record(|calls| calls.begin_transaction += 1);
        let staged = self.shared.committed().clone();
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.shared),
            faults: self.faults,
            staged,
            inserts: 0,
            finished: false,
        }))
    }
}

struct InMemoryTransaction {
    shared: Arc<Shared>,
    faults: Faults,
    staged: Tables,
    inserts: usize,
    finished: bool,
}

impl InMemoryTransaction {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.finished {
            Err(StoreError::query("transaction already finished"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn insert_batch(&mut self, batch: &RecordBatch) -> Result<(), StoreError> {
        self.shared.record(|calls| calls.insert_batch += 1);
        self.ensure_open()?;
        self.inserts = self.inserts.saturating_add(1);
        if self.faults.insert_failure_at == Some(self.inserts) {
            return Err(StoreError::connection(format!(
                "injected failure on insert {}",
                self.inserts
            )));
        }
        // A failed statement leaves the staged tables untouched.
        let mut next = self.staged.clone();
        next.insert(batch)?;
        self.staged = next;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.shared.record(|calls| calls.commit += 1);
        self.ensure_open()?;
        self.finished = true;
        if self.faults.fail_commit {
            return Err(StoreError::query("injected commit failure"));
        }
        *self.shared.committed() = std::mem::take(&mut self.staged);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.shared.record(|calls| calls.rollback += 1);
        self.finished = true;
        self.staged = Tables::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory store.

    use super::*;
    use rstest::{fixture, rstest};
    use storefront_data::{CatalogItemRecord, CategoryRecord, CustomerRecord, ReviewRecord};

    fn category(id: u128) -> CategoryRecord {
        CategoryRecord {
            id: Uuid::from_u128(id),
            name: format!("category {id}"),
        }
    }

    fn customer(id: u128) -> CustomerRecord {
        CustomerRecord {
            id: Uuid::from_u128(id),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada.lovelace1@example.com".to_owned(),
            user_name: "ada.lovelace1@example.com".to_owned(),
            normalized_email: "ADA.LOVELACE1@EXAMPLE.COM".to_owned(),
            normalized_user_name: "ADA.LOVELACE1@EXAMPLE.COM".to_owned(),
            password_hash: "hash".to_owned(),
            email_confirmed: true,
        }
    }

    fn item(id: u128, category_id: u128) -> CatalogItemRecord {
        CatalogItemRecord {
            id: Uuid::from_u128(id),
            category_id: Uuid::from_u128(category_id),
            name: "Lamp".to_owned(),
            price_cents: 1_000,
            description: "A lamp.".to_owned(),
            quantity: 3,
            image_url: "https://picsum.photos/id/1/200/300".to_owned(),
            company: "Acme".to_owned(),
            is_on_sale: false,
            sale_price_cents: None,
            url: "https://example.com".to_owned(),
        }
    }

    #[fixture]
    fn store() -> InMemoryStorefrontStore {
        InMemoryStorefrontStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn commit_makes_staged_rows_visible(store: InMemoryStorefrontStore) {
        let mut transaction = store.begin_transaction().await.expect("begin");
        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(1)]))
            .await
            .expect("insert");
        assert!(store.committed_ids(EntityKind::Category).is_empty());

        transaction.commit().await.expect("commit");

        assert_eq!(
            store.committed_ids(EntityKind::Category),
            IdSet::from([Uuid::from_u128(1)])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn rollback_discards_and_is_idempotent(store: InMemoryStorefrontStore) {
        let mut transaction = store.begin_transaction().await.expect("begin");
        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(1)]))
            .await
            .expect("insert");

        transaction.rollback().await.expect("first rollback");
        transaction.rollback().await.expect("second rollback");

        assert!(store.committed_ids(EntityKind::Category).is_empty());
        assert!(transaction.commit().await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn foreign_keys_are_enforced(store: InMemoryStorefrontStore) {
        let mut transaction = store.begin_transaction().await.expect("begin");
        let error = transaction
            .insert_batch(&RecordBatch::CatalogItems(vec![item(2, 1)]))
            .await
            .expect_err("missing category");

        assert!(matches!(error, StoreError::Constraint { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_statement_leaves_earlier_rows_staged(store: InMemoryStorefrontStore) {
        let mut transaction = store.begin_transaction().await.expect("begin");
        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(1)]))
            .await
            .expect("insert");
        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(2), category(1)]))
            .await
            .expect_err("duplicate id");
        transaction.commit().await.expect("commit");

        assert_eq!(
            store.committed_ids(EntityKind::Category),
            IdSet::from([Uuid::from_u128(1)])
        );
    }

    #[rstest]
    #[case(5, true)]
    #[case(6, false)]
    fn review_ratings_are_checked(#[case] rating: i32, #[case] accepted: bool) {
        let result = InMemoryStorefrontStore::with_committed(&[
            RecordBatch::Customers(vec![customer(1)]),
            RecordBatch::Categories(vec![category(3)]),
            RecordBatch::CatalogItems(vec![item(2, 3)]),
            RecordBatch::Reviews(vec![ReviewRecord {
                id: Uuid::from_u128(9),
                customer_id: Uuid::from_u128(1),
                catalog_item_id: Uuid::from_u128(2),
                comment: "Great".to_owned(),
                rating,
            }]),
        ]);

        assert_eq!(result.is_ok(), accepted);
    }

    #[rstest]
    #[tokio::test]
    async fn injected_insert_failure_hits_the_nth_insert() {
        let store = InMemoryStorefrontStore::new().with_insert_failure(2);
        let mut transaction = store.begin_transaction().await.expect("begin");

        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(1)]))
            .await
            .expect("first insert");
        let error = transaction
            .insert_batch(&RecordBatch::Categories(vec![category(2)]))
            .await
            .expect_err("second insert fails");

        assert_eq!(error, StoreError::connection("injected failure on insert 2"));
    }

    #[rstest]
    #[tokio::test]
    async fn injected_commit_failure_applies_nothing() {
        let store = InMemoryStorefrontStore::new().with_commit_failure();
        let mut transaction = store.begin_transaction().await.expect("begin");
        transaction
            .insert_batch(&RecordBatch::Categories(vec![category(1)]))
            .await
            .expect("insert");

        assert!(transaction.commit().await.is_err());
        assert!(store.committed_ids(EntityKind::Category).is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn listing_order_line_ids_fails(store: InMemoryStorefrontStore) {
        let error = store
            .list_ids(EntityKind::OrderLine)
            .await
            .expect_err("keyless kind");

        assert_eq!(error, keyless_kind_error(EntityKind::OrderLine));
    }

    #[rstest]
    #[tokio::test]
    async fn every_call_is_counted(store: InMemoryStorefrontStore) {
        store.list_ids(EntityKind::Customer).await.expect("list");
        store.list_order_lines().await.expect("list");
        let mut transaction = store.begin_transaction().await.expect("begin");
        transaction.rollback().await.expect("rollback");

        let calls = store.calls();
        assert_eq!(calls.list_ids, 1);
        assert_eq!(calls.rollback, 1);
        assert_eq!(calls.total(), 4);
    }
}
