//! Storefront seeding backend.
//!
//! Wires the `storefront-data` generator to a transactional store: the
//! [`domain`] layer owns run orchestration, [`outbound`] provides the
//! PostgreSQL and in-memory store adapters, and [`seeding`] loads runtime
//! settings.

pub mod domain;
pub mod outbound;
pub mod seeding;
