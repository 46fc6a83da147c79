//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod storefront_store;

#[cfg(test)]
pub use storefront_store::{MockStoreTransaction, MockStorefrontStore};
pub use storefront_store::{StoreError, StoreTransaction, StorefrontStore, keyless_kind_error};
