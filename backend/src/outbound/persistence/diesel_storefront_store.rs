//! PostgreSQL-backed storefront store.
//!
//! This adapter implements the `StorefrontStore` port. Reads use a pooled
//! connection per call. A transaction checks out an owned connection, opens
//! a database transaction on it and keeps both until commit or rollback.
//! Dropping an unfinished transaction returns a connection with an open
//! transaction to the pool, which the pool discards as broken; the server
//! then rolls the work back.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use storefront_data::{EntityKind, IdSet, OrderLineKey, RecordBatch};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{StoreError, StoreTransaction, StorefrontStore, keyless_kind_error};

use super::models::{
    NewAddressRow, NewCatalogItemRow, NewCategoryRow, NewCustomerRow, NewOrderLineRow,
    NewOrderRow, NewReportRow, NewReviewRow, NewShippingAddressRow, OrderLineKeyRow,
};
use super::pool::{DbPool, OwnedConnection, PoolError};
use super::schema::{
    addresses, catalog_items, categories, customers, order_lines, orders, reports, reviews,
    shipping_addresses,
};

/// Rows per `INSERT` statement.
///
/// The widest table binds 11 parameters per row, which keeps every statement
/// well under PostgreSQL's limit of 65 535 bind parameters.
const MAX_ROWS_PER_STATEMENT: usize = 4_000;

/// Insert `$records` into `$table` in chunks, converting each record into
/// `$row` via `From`. Empty input issues no statement.
macro_rules! insert_chunked {
    ($conn:expr, $table:path, $row:ty, $records:expr) => {{
        for chunk in $records.chunks(MAX_ROWS_PER_STATEMENT) {
            let rows: Vec<$row> = chunk.iter().map(<$row>::from).collect();
            diesel::insert_into($table)
                .values(&rows)
                .execute(&mut *$conn)
                .await
                .map_err(map_diesel_error)?;
        }
    }};
}

/// Diesel-backed implementation of the storefront store port.
#[derive(Clone)]
pub struct DieselStorefrontStore {
    pool: DbPool,
}

impl DieselStorefrontStore {
    /// Create a new store with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use storefront_backend::outbound::persistence::{
    ///     DbPool, DieselStorefrontStore, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/shop")).await?;
    /// let store = DieselStorefrontStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to store errors.
fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to store errors.
fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                error = %error_message,
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error_message,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation,
            info,
        ) => StoreError::constraint(info.message().to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => StoreError::query(info.message().to_owned()),
        DieselError::BrokenTransactionManager => {
            StoreError::connection("transaction manager is broken")
        }
        _ => StoreError::query(error_message),
    }
}

fn into_keys(rows: Vec<OrderLineKeyRow>) -> BTreeSet<OrderLineKey> {
    rows.into_iter()
        .map(|row| OrderLineKey {
            catalog_item_id: row.catalog_item_id,
            order_id: row.order_id,
        })
        .collect()
}

#[async_trait]
impl StorefrontStore for DieselStorefrontStore {
    async fn list_ids(&self, kind: EntityKind) -> Result<IdSet, StoreError> {
        if !kind.has_identifier() {
            return Err(keyless_kind_error(kind));
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = match kind {
            EntityKind::Customer => {
                customers::table
                    .select(customers::id)
                    .load::<Uuid>(&mut conn)
                    .await
            }
            EntityKind::Address => {
                addresses::table
                    .select(addresses::id)
                    .load::<Uuid>(&mut conn)
                    .await
            }
            EntityKind::Category => {
                categories::table
                    .select(categories::id)
                    .load::<Uuid>(&mut conn)
                    .await
            }
            EntityKind::CatalogItem => {
                catalog_items::table
                    .select(catalog_items::id)
                    .load::<Uuid>(&mut conn)
                    .await
            }
            EntityKind::ShippingAddress => {
                shipping_addresses::table
                    .select(shipping_addresses::id)
                    .load::<Uuid>(&mut conn)
                    .await
            }
            EntityKind::Order => orders::table.select(orders::id).load::<Uuid>(&mut conn).await,
            EntityKind::Review => reviews::table.select(reviews::id).load::<Uuid>(&mut conn).await,
            EntityKind::Report => reports::table.select(reports::id).load::<Uuid>(&mut conn).await,
            EntityKind::OrderLine => return Err(keyless_kind_error(kind)),
        }
        .map_err(map_diesel_error)?;
        Ok(ids.into_iter().collect())
    }

    async fn list_order_lines(&self) -> Result<BTreeSet<OrderLineKey>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = order_lines::table
            .select(OrderLineKeyRow::as_select())
            .load::<OrderLineKeyRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(into_keys(rows))
    }

    async fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let mut connection = self.pool.get_owned().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *connection)
            .await
            .map_err(map_diesel_error)?;
        Ok(Box::new(DieselStoreTransaction {
            connection: Some(connection),
        }))
    }
}

/// A database transaction that owns its pooled connection.
///
/// The connection is released as soon as the transaction commits or rolls
/// back; later calls report a query error.
struct DieselStoreTransaction {
    connection: Option<OwnedConnection>,
}

impl DieselStoreTransaction {
    fn connection(&mut self) -> Result<&mut AsyncPgConnection, StoreError> {
        self.connection
            .as_deref_mut()
            .ok_or_else(|| StoreError::query("transaction already finished"))
    }
}

#[async_trait]
impl StoreTransaction for DieselStoreTransaction {
    async fn insert_batch(&mut self, batch: &RecordBatch) -> Result<(), StoreError> {
        let conn = self.connection()?;
        match batch {
            RecordBatch::Customers(records) => {
                insert_chunked!(conn, customers::table, NewCustomerRow<'_>, records);
            }
            RecordBatch::Addresses(records) => {
                insert_chunked!(conn, addresses::table, NewAddressRow<'_>, records);
            }
            RecordBatch::Categories(records) => {
                insert_chunked!(conn, categories::table, NewCategoryRow<'_>, records);
            }
            RecordBatch::CatalogItems(records) => {
                insert_chunked!(conn, catalog_items::table, NewCatalogItemRow<'_>, records);
            }
            RecordBatch::ShippingAddresses(records) => {
                insert_chunked!(
                    conn,
                    shipping_addresses::table,
                    NewShippingAddressRow<'_>,
                    records
                );
            }
            RecordBatch::Orders(records) => {
                insert_chunked!(conn, orders::table, NewOrderRow, records);
            }
            RecordBatch::OrderLines(records) => {
                insert_chunked!(conn, order_lines::table, NewOrderLineRow, records);
            }
            RecordBatch::Reviews(records) => {
                insert_chunked!(conn, reviews::table, NewReviewRow<'_>, records);
            }
            RecordBatch::Reports(records) => {
                insert_chunked!(conn, reports::table, NewReportRow<'_>, records);
            }
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut connection = self
            .connection
            .take()
            .ok_or_else(|| StoreError::query("transaction already finished"))?;
        // On failure the manager rolls back itself; the connection is
        // released either way.
        AnsiTransactionManager::commit_transaction(&mut *connection)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };
        AnsiTransactionManager::rollback_transaction(&mut *connection)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for store error mapping.
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            None
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let store_err = map_pool_error(PoolError::checkout("timed out"));

        assert_eq!(store_err, StoreError::connection("timed out"));
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation)]
    #[case(DatabaseErrorKind::ForeignKeyViolation)]
    #[case(DatabaseErrorKind::CheckViolation)]
    fn constraint_violations_map_to_constraint_errors(#[case] kind: DatabaseErrorKind) {
        let store_err = map_diesel_error(database_error(kind, "violates order_lines_pkey"));

        assert_eq!(store_err, StoreError::constraint("violates order_lines_pkey"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let store_err = map_diesel_error(database_error(
            DatabaseErrorKind::ClosedConnection,
            "server closed the connection",
        ));

        assert!(matches!(store_err, StoreError::Connection { .. }));
    }

    #[rstest]
    fn serialization_failure_maps_to_query_error() {
        let store_err = map_diesel_error(database_error(
            DatabaseErrorKind::SerializationFailure,
            "could not serialize access",
        ));

        assert_eq!(store_err, StoreError::query("could not serialize access"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let store_err = map_diesel_error(DieselError::NotFound);

        assert!(matches!(store_err, StoreError::Query { .. }));
    }

    #[rstest]
    fn order_line_rows_become_keys() {
        let keys = into_keys(vec![OrderLineKeyRow {
            catalog_item_id: Uuid::from_u128(1),
            order_id: Uuid::from_u128(2),
        }]);

        assert_eq!(
            keys,
            BTreeSet::from([OrderLineKey {
                catalog_item_id: Uuid::from_u128(1),
                order_id: Uuid::from_u128(2),
            }])
        );
    }
}
