//! Dependency-ordered generation of a whole run.
//!
//! The generator walks the requested kinds in creation order, calls each
//! kind's factory, and folds every produced batch back into the lookups so
//! later kinds can reference it. Missing prerequisites are provisioned with
//! the request's count, at most once per kind, and the provisioned batches
//! belong to the same run.

use std::collections::{BTreeMap, BTreeSet};

use crate::entity::EntityKind;
use crate::error::GenerationError;
use crate::factory;
use crate::lookups::DependencyLookups;
use crate::records::RecordBatch;
use crate::request::{KindSelection, RunRequest};
use crate::values::ValueProvider;

/// Why a kind's records are part of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Named by the request.
    Requested,
    /// Implied by a requested kind, as order lines are by orders.
    Implied,
    /// Generated because a later kind needed it and none existed.
    Provisioned,
}

/// The ordered output of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRun {
    batches: Vec<RecordBatch>,
    provenance: BTreeMap<EntityKind, Provenance>,
}

impl GeneratedRun {
    /// Returns the batches in creation order, one per kind.
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Consumes the run, yielding its batches in creation order.
    #[must_use]
    pub fn into_batches(self) -> Vec<RecordBatch> {
        self.batches
    }

    /// Returns why `kind` is part of the run, if it is.
    #[must_use]
    pub fn provenance(&self, kind: EntityKind) -> Option<Provenance> {
        self.provenance.get(&kind).copied()
    }

    /// Returns the requestable kinds generated only to satisfy dependencies.
    ///
    /// Owned kinds share their owner's provenance and are not listed.
    #[must_use]
    pub fn provisioned(&self) -> Vec<EntityKind> {
        self.provenance
            .iter()
            .filter(|(kind, provenance)| {
                kind.is_requestable() && **provenance == Provenance::Provisioned
            })
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Returns the number of records generated per kind.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<EntityKind, usize> {
        self.batches
            .iter()
            .map(|batch| (batch.kind(), batch.len()))
            .collect()
    }

    /// Returns the number of records across all batches.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.batches.iter().map(RecordBatch::len).sum()
    }
}

/// Generates every batch a request needs.
///
/// `lookups` holds the identifiers already in the store. Requested kinds are
/// processed in creation order; a kind whose requestable dependency has no
/// known identifiers first gets that dependency generated with the same
/// count. A factory that still reports an unsatisfied dependency has it
/// provisioned once and is retried once.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] when a dependency
/// cannot be provisioned, or propagates provider failures.
///
/// # Example
///
/// ```
/// use storefront_data::{
///     DependencyLookups, EntityKind, FakeValueProvider, RunRequest, generate_run,
/// };
///
/// let request = RunRequest::parse(["catalog-item"], 2).expect("valid request");
/// let mut provider = FakeValueProvider::from_seed(42);
/// let run = generate_run(&request, DependencyLookups::new(), &mut provider)
///     .expect("categories are provisioned");
///
/// assert_eq!(run.provisioned(), [EntityKind::Category]);
/// assert_eq!(run.total_records(), 4);
/// ```
pub fn generate_run(
    request: &RunRequest,
    lookups: DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<GeneratedRun, GenerationError> {
    let mut generator = Generator {
        count: request.count(),
        lookups,
        provider,
        generated: BTreeSet::new(),
        batches: Vec::new(),
        provenance: BTreeMap::new(),
    };

    for kind in request.kinds() {
        generator.generate(kind, provenance_of(kind, request))?;
    }

    Ok(generator.finish())
}

/// A kind the request yields without naming it is implied by another.
fn provenance_of(kind: EntityKind, request: &RunRequest) -> Provenance {
    match request.selection() {
        KindSelection::Kinds(kinds) if !kinds.contains(&kind) => Provenance::Implied,
        KindSelection::Kinds(_) | KindSelection::All => Provenance::Requested,
    }
}

struct Generator<'a> {
    count: usize,
    lookups: DependencyLookups,
    provider: &'a mut dyn ValueProvider,
    generated: BTreeSet<EntityKind>,
    batches: Vec<RecordBatch>,
    provenance: BTreeMap<EntityKind, Provenance>,
}

impl Generator<'_> {
    fn generate(&mut self, kind: EntityKind, provenance: Provenance) -> Result<(), GenerationError> {
        if self.generated.contains(&kind) {
            return Ok(());
        }
        self.ensure_prerequisites(kind)?;
        let produced = self.build_with_recovery(kind)?;
        self.generated.insert(kind);

        for batch in produced {
            self.lookups.absorb(&batch);
            self.provenance.insert(batch.kind(), provenance);
            self.batches.push(batch);
        }
        Ok(())
    }

    fn ensure_prerequisites(&mut self, kind: EntityKind) -> Result<(), GenerationError> {
        for dependency in kind.dependencies() {
            if self.needs_provisioning(*dependency) && self.lookups.is_empty(*dependency) {
                self.generate(*dependency, Provenance::Provisioned)?;
            }
        }
        Ok(())
    }

    fn build_with_recovery(&mut self, kind: EntityKind) -> Result<Vec<RecordBatch>, GenerationError> {
        match factory::build(kind, self.count, &self.lookups, &mut *self.provider) {
            Err(GenerationError::UnsatisfiedDependency { kind: missing })
                if self.needs_provisioning(missing) =>
            {
                self.generate(missing, Provenance::Provisioned)?;
                factory::build(kind, self.count, &self.lookups, &mut *self.provider)
            }
            other => other,
        }
    }

    fn needs_provisioning(&self, kind: EntityKind) -> bool {
        kind.is_requestable() && !self.generated.contains(&kind)
    }

    fn finish(self) -> GeneratedRun {
        let mut batches = self.batches;
        batches.sort_by_key(|batch| batch.kind().topological_position());
        GeneratedRun {
            batches,
            provenance: self.provenance,
        }
    }
}
