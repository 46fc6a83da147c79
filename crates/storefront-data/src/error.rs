//! Error types for the storefront-data crate.
//!
//! This module defines semantic error enums for run request validation and
//! record generation, following the project's error handling conventions
//! with `thiserror`.

use thiserror::Error;

use crate::entity::EntityKind;

/// Errors raised while validating a run request.
///
/// A request that fails validation never reaches the generator or the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunRequestError {
    /// The record count was zero or negative.
    #[error("invalid run request: record count must be positive, got {count}")]
    NonPositiveCount {
        /// The rejected count.
        count: i64,
    },

    /// The record count does not fit the generator's counter type.
    #[error("invalid run request: record count {count} is too large")]
    CountTooLarge {
        /// The rejected count.
        count: i64,
    },

    /// A requested entity kind name is not recognised.
    #[error("invalid run request: unknown entity kind '{name}'")]
    UnknownKind {
        /// The name that failed to parse.
        name: String,
    },

    /// The entity kind is only ever created by its owning kind.
    #[error("invalid run request: {kind} records are created with their {owner}")]
    NotRequestable {
        /// The owned kind that was requested.
        kind: EntityKind,
        /// The kind whose factory creates it.
        owner: EntityKind,
    },

    /// No entity kinds were selected.
    #[error("invalid run request: no entity kinds selected")]
    EmptySelection,
}

/// Errors that can occur during record generation.
///
/// These errors indicate failures in the generation process itself, before
/// anything has been handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A factory needed a non-empty identifier set that was empty.
    #[error("unsatisfied dependency: {kind}")]
    UnsatisfiedDependency {
        /// The kind whose identifiers were missing.
        kind: EntityKind,
    },

    /// The value provider could not produce a value.
    #[error("generation unavailable: {message}")]
    GenerationUnavailable {
        /// Description of the provider failure.
        message: String,
    },
}

impl GenerationError {
    /// Builds an [`GenerationError::UnsatisfiedDependency`] for `kind`.
    #[must_use]
    pub const fn unsatisfied(kind: EntityKind) -> Self {
        Self::UnsatisfiedDependency { kind }
    }

    /// Builds a [`GenerationError::GenerationUnavailable`] with `message`.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::GenerationUnavailable {
            message: message.into(),
        }
    }
}
