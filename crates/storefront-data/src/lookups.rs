//! Identifier sets visible to factories.
//!
//! Factories never see full records, only the identifiers of the kinds they
//! reference. The generator seeds a [`DependencyLookups`] from the store and
//! folds every batch it produces back in, so later kinds can reference rows
//! created earlier in the same run.

use std::collections::{BTreeMap, BTreeSet};

use crate::entity::{EntityKind, IdSet, OrderLineKey};
use crate::records::RecordBatch;

static NO_IDS: IdSet = BTreeSet::new();

/// Identifier sets known to a run, split by where they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLookups {
    known: BTreeMap<EntityKind, IdSet>,
    in_run: BTreeMap<EntityKind, IdSet>,
    order_lines: BTreeSet<OrderLineKey>,
}

impl DependencyLookups {
    /// Creates lookups with no known identifiers, as for an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds identifiers that already exist in the store.
    #[must_use]
    pub fn with_existing(mut self, kind: EntityKind, ids: IdSet) -> Self {
        self.known.entry(kind).or_default().extend(ids);
        self
    }

    /// Adds order-line pairs that already exist in the store.
    #[must_use]
    pub fn with_order_lines(mut self, keys: BTreeSet<OrderLineKey>) -> Self {
        self.order_lines.extend(keys);
        self
    }

    /// Returns every identifier of `kind`, pre-existing or generated.
    #[must_use]
    pub fn ids(&self, kind: EntityKind) -> &IdSet {
        self.known.get(&kind).unwrap_or(&NO_IDS)
    }

    /// Returns the identifiers of `kind` generated in this run.
    #[must_use]
    pub fn generated_ids(&self, kind: EntityKind) -> &IdSet {
        self.in_run.get(&kind).unwrap_or(&NO_IDS)
    }

    /// Returns `true` when no identifier of `kind` is known.
    #[must_use]
    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.ids(kind).is_empty()
    }

    /// Returns every known order-line pair.
    #[must_use]
    pub const fn order_lines(&self) -> &BTreeSet<OrderLineKey> {
        &self.order_lines
    }

    /// Records the contents of a freshly generated batch.
    pub fn absorb(&mut self, batch: &RecordBatch) {
        let kind = batch.kind();
        if kind.has_identifier() {
            let ids = batch.ids();
            self.known.entry(kind).or_default().extend(ids.iter().copied());
            self.in_run.entry(kind).or_default().extend(ids);
        } else {
            self.order_lines.extend(batch.order_line_keys());
        }
    }
}
