//! Storefront seeding run orchestration.
//!
//! A run validates its request, reads the identifiers already committed,
//! generates every batch in memory, and hands the batches to the
//! [`BatchApplier`] for a single atomic commit.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use storefront_data::{
    DependencyLookups, EntityKind, GenerationError, RunRequest, RunRequestError, ValueProvider,
    generate_run,
};
use thiserror::Error;
use tracing::info;

use crate::domain::batch_applier::{ApplyError, BatchApplier};
use crate::domain::ports::{StoreError, StorefrontStore};

/// Kinds whose committed identifiers feed generation.
const LOOKUP_KINDS: [EntityKind; 4] = [
    EntityKind::Customer,
    EntityKind::Category,
    EntityKind::CatalogItem,
    EntityKind::Order,
];

/// Result of a committed seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Records committed per kind, owned kinds included.
    pub counts: BTreeMap<EntityKind, usize>,
    /// Kinds generated only because a requested kind needed them.
    pub provisioned: Vec<EntityKind>,
    /// Records committed across every kind.
    pub total_records: usize,
}

impl RunOutcome {
    /// Human-readable one-line summary of the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use storefront_backend::domain::RunOutcome;
    /// use storefront_data::EntityKind;
    ///
    /// let outcome = RunOutcome {
    ///     counts: BTreeMap::from([(EntityKind::Category, 3)]),
    ///     provisioned: Vec::new(),
    ///     total_records: 3,
    /// };
    /// assert_eq!(outcome.summary(), "committed 3 records: Category=3");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!("committed {} records:", self.total_records);
        let mut separator = " ";
        for (kind, count) in &self.counts {
            let _ = write!(summary, "{separator}{kind}={count}");
            separator = ", ";
        }
        if !self.provisioned.is_empty() {
            let names: Vec<&str> = self.provisioned.iter().map(|kind| kind.name()).collect();
            let _ = write!(summary, " (provisioned {})", names.join(", "));
        }
        summary
    }
}

/// Errors surfaced by a seeding run.
///
/// `Display` yields the innermost cause so callers can print it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The request failed validation; the store was not touched.
    #[error(transparent)]
    InvalidRequest(#[from] RunRequestError),
    /// A factory found no identifiers of `kind` even after provisioning.
    #[error("unsatisfied dependency: {kind}")]
    UnsatisfiedDependency {
        /// The kind whose identifiers were missing.
        kind: EntityKind,
    },
    /// The value provider failed; nothing was staged.
    #[error("generation unavailable: {message}")]
    GenerationUnavailable {
        /// Description of the provider failure.
        message: String,
    },
    /// Applying the batches failed and the transaction was discarded.
    #[error(transparent)]
    StoreWriteFailure(#[from] ApplyError),
    /// Reading committed identifiers failed before generation.
    #[error("store read failed: {source}")]
    StoreReadFailure {
        /// The store failure.
        source: StoreError,
    },
}

impl From<GenerationError> for RunError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::UnsatisfiedDependency { kind } => Self::UnsatisfiedDependency { kind },
            GenerationError::GenerationUnavailable { message } => {
                Self::GenerationUnavailable { message }
            }
        }
    }
}

impl RunError {
    const fn read(source: StoreError) -> Self {
        Self::StoreReadFailure { source }
    }
}

/// Service that runs storefront seeding requests against a store.
#[derive(Clone)]
pub struct StorefrontSeeder<S> {
    store: Arc<S>,
}

impl<S> StorefrontSeeder<S> {
    /// Create a new seeder over `store`.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> StorefrontSeeder<S>
where
    S: StorefrontStore,
{
    /// Parse `names` and `count` into a request, then run it.
    ///
    /// An invalid request is rejected before any store call.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] as described on [`StorefrontSeeder::run`].
    pub async fn run_named<I, N>(
        &self,
        names: I,
        count: i64,
        provider: &mut (dyn ValueProvider + Send),
    ) -> Result<RunOutcome, RunError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let request = RunRequest::parse(names, count)?;
        self.run(&request, provider).await
    }

    /// Run a validated request and commit its batches atomically.
    ///
    /// # Errors
    ///
    /// - [`RunError::StoreReadFailure`] when committed identifiers cannot be
    ///   listed.
    /// - [`RunError::UnsatisfiedDependency`] or
    ///   [`RunError::GenerationUnavailable`] when generation fails.
    /// - [`RunError::StoreWriteFailure`] when the apply fails; nothing from
    ///   the run is visible afterwards.
    pub async fn run(
        &self,
        request: &RunRequest,
        provider: &mut (dyn ValueProvider + Send),
    ) -> Result<RunOutcome, RunError> {
        info!(
            kinds = ?request.kinds(),
            count = request.count(),
            "starting storefront seeding run"
        );
        let lookups = self.load_lookups().await?;
        let run = generate_run(request, lookups, provider)?;

        let provisioned = run.provisioned();
        for kind in &provisioned {
            info!(kind = %kind, "provisioned prerequisite kind");
        }
        let counts = run.counts();
        let total_records = run.total_records();

        BatchApplier::new(self.store.as_ref())
            .apply(run.batches())
            .await?;

        Ok(RunOutcome {
            counts,
            provisioned,
            total_records,
        })
    }

    async fn load_lookups(&self) -> Result<DependencyLookups, RunError> {
        let mut lookups = DependencyLookups::new();
        for kind in LOOKUP_KINDS {
            let ids = self.store.list_ids(kind).await.map_err(RunError::read)?;
            lookups = lookups.with_existing(kind, ids);
        }
        let order_lines = self
            .store
            .list_order_lines()
            .await
            .map_err(RunError::read)?;
        Ok(lookups.with_order_lines(order_lines))
    }
}
