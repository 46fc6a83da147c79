//! Storefront seeding domain.
//!
//! Purpose: Orchestrate seeding runs over the storefront store port. Record
//! generation lives in `storefront-data`; this layer reads committed
//! identifiers, applies generated batches atomically and reports outcomes.
//!
//! Public surface:
//! - BatchApplier (alias to `batch_applier::BatchApplier`): single-commit
//!   batch insertion with rollback on failure.
//! - StorefrontSeeder (alias to `seeder::StorefrontSeeder`): runs one
//!   request end to end.
//! - RunOutcome / RunError: run summary and failure taxonomy.

pub mod batch_applier;
pub mod ports;
pub mod seeder;

pub use self::batch_applier::{AppliedRun, ApplyError, ApplyState, BatchApplier};
pub use self::seeder::{RunError, RunOutcome, StorefrontSeeder};
