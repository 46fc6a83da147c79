//! Deterministic, referentially consistent storefront sample data.
//!
//! This crate generates synthetic customers, catalog items, orders and their
//! satellites in memory. It performs no I/O: callers supply the identifiers
//! already present in their store and receive record batches ordered so that
//! every reference points at a row created earlier.
//!
//! # Overview
//!
//! - [`EntityKind`] and its dependency table fix the creation order.
//! - [`ValueProvider`] supplies scalar fake values; [`FakeValueProvider`] is
//!   reproducible for a given seed.
//! - The [`factory`] functions build records of one kind from identifier
//!   lookups.
//! - [`generate_run`] walks a validated [`RunRequest`], provisioning missing
//!   prerequisites within the same run.
//!
//! # Example
//!
//! ```
//! use storefront_data::{
//!     DependencyLookups, EntityKind, FakeValueProvider, RunRequest, generate_run,
//! };
//!
//! let request = RunRequest::parse(["order"], 3).expect("valid request");
//! let mut provider = FakeValueProvider::from_seed(42);
//! let run = generate_run(&request, DependencyLookups::new(), &mut provider)
//!     .expect("generation succeeds");
//!
//! assert_eq!(run.counts().get(&EntityKind::Order), Some(&3));
//! assert_eq!(run.counts().get(&EntityKind::ShippingAddress), Some(&3));
//! ```

mod entity;
mod error;
pub mod factory;
mod generator;
mod lookups;
mod records;
mod request;
mod sampling;
mod values;

pub use entity::{EntityKind, IdSet, OrderLineKey, topological_order};
pub use error::{GenerationError, RunRequestError};
pub use factory::build;
pub use generator::{GeneratedRun, Provenance, generate_run};
pub use lookups::DependencyLookups;
pub use records::{
    AddressRecord, CatalogItemRecord, CategoryRecord, CustomerRecord, OrderLineRecord,
    OrderRecord, OrderStatus, PostalAddress, RecordBatch, ReportRecord, ReviewRecord,
    ShippingAddressRecord,
};
pub use request::{KindSelection, MAX_RECORD_COUNT, RunRequest};
pub use sampling::{pick_one, sample_distinct};
pub use values::{FakeValueProvider, TextKind, ValueProvider};
