//! Transactional application of ordered record batches.
//!
//! The applier opens one store transaction, inserts every batch in the order
//! given, and commits. Any failure rolls the whole transaction back so a
//! partial run is never visible to readers. There are no retries: each call
//! makes exactly one attempt.

use std::fmt;

use storefront_data::RecordBatch;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ports::{StoreError, StoreTransaction, StorefrontStore};

/// Lifecycle of a single apply attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyState {
    /// No transaction has been opened.
    Idle,
    /// A transaction is open and batches are being inserted.
    Staging,
    /// Every batch was inserted and the commit is in flight.
    Committing,
    /// The transaction committed.
    Committed,
    /// The transaction was discarded.
    RolledBack,
}

impl ApplyState {
    /// Stable label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Staging => "staging",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for ApplyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a committed apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRun {
    /// Number of batches inserted.
    pub batches: usize,
    /// Number of records inserted across every batch.
    pub records: usize,
}

/// A failed apply. Nothing from the attempt is visible to readers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store write failed: {cause}")]
pub struct ApplyError {
    /// The store failure that ended the attempt.
    pub cause: StoreError,
    /// Batches fully inserted before the failure.
    pub staged_batches: usize,
    /// Set when the rollback itself also failed.
    pub rollback_error: Option<StoreError>,
}

impl ApplyError {
    const fn new(cause: StoreError, staged_batches: usize) -> Self {
        Self {
            cause,
            staged_batches,
            rollback_error: None,
        }
    }
}

/// Applies ordered batches inside one store transaction.
///
/// # Examples
///
/// ```rust,no_run
/// use storefront_backend::domain::BatchApplier;
/// use storefront_backend::outbound::InMemoryStorefrontStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStorefrontStore::new();
/// let applied = BatchApplier::new(&store).apply(&[]).await?;
/// assert_eq!(applied.records, 0);
/// assert!(store.committed_ids(storefront_data::EntityKind::Category).is_empty());
/// # Ok(())
/// # }
/// ```
pub struct BatchApplier<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> BatchApplier<'a, S>
where
    S: StorefrontStore + ?Sized,
{
    /// Create an applier over `store`.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Insert `batches` in order and commit them as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] when the transaction cannot be opened, when an
    /// insert fails (after rolling back), or when the commit fails.
    pub async fn apply(&self, batches: &[RecordBatch]) -> Result<AppliedRun, ApplyError> {
        let mut state = ApplyState::Idle;
        let mut transaction = self
            .store
            .begin_transaction()
            .await
            .map_err(|cause| ApplyError::new(cause, 0))?;
        transition(&mut state, ApplyState::Staging);

        let mut records = 0_usize;
        for (staged, batch) in batches.iter().enumerate() {
            debug!(
                state = %state,
                kind = %batch.kind(),
                records = batch.len(),
                "inserting batch"
            );
            if let Err(cause) = transaction.insert_batch(batch).await {
                let error = ApplyError::new(cause, staged);
                return Err(roll_back(transaction.as_mut(), &mut state, error).await);
            }
            records = records.saturating_add(batch.len());
        }

        transition(&mut state, ApplyState::Committing);
        if let Err(cause) = transaction.commit().await {
            transition(&mut state, ApplyState::RolledBack);
            warn!(error = %cause, "commit failed; transaction discarded");
            return Err(ApplyError::new(cause, batches.len()));
        }
        transition(&mut state, ApplyState::Committed);
        info!(batches = batches.len(), records, "run committed");

        Ok(AppliedRun {
            batches: batches.len(),
            records,
        })
    }
}

fn transition(state: &mut ApplyState, next: ApplyState) {
    debug!(from = %state, to = %next, "apply state transition");
    *state = next;
}

async fn roll_back(
    transaction: &mut dyn StoreTransaction,
    state: &mut ApplyState,
    mut error: ApplyError,
) -> ApplyError {
    warn!(
        error = %error.cause,
        staged_batches = error.staged_batches,
        "insert failed; rolling back"
    );
    if let Err(rollback_error) = transaction.rollback().await {
        warn!(error = %rollback_error, "rollback failed");
        error.rollback_error = Some(rollback_error);
    }
    transition(state, ApplyState::RolledBack);
    error
}
