//! Entity kinds and the dependency table that orders their creation.
//!
//! Every kind declares the kinds it references. The creation order is a
//! topological sort of that table, computed once and shared by the
//! generator and by anything that needs to order record batches.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RunRequestError;

/// Identifiers of the records of one kind known to a run.
///
/// A `BTreeSet` keeps iteration order stable, which keeps seeded runs
/// reproducible.
pub type IdSet = BTreeSet<Uuid>;

/// One of the fixed storefront record categories.
///
/// Variants are declared in creation order; the declaration order is also
/// the tie-break for the topological sort.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Storefront customer account.
    Customer,
    /// Postal address attached one-to-one to a customer.
    Address,
    /// Catalog category.
    Category,
    /// Sellable catalog item.
    CatalogItem,
    /// Delivery address owned by exactly one order.
    ShippingAddress,
    /// Customer order.
    Order,
    /// Quantity entry linking a catalog item to an order.
    OrderLine,
    /// Customer review of a catalog item.
    Review,
    /// Customer support report.
    Report,
}

/// Declared references between kinds: `(kind, kinds it references)`.
const DEPENDENCY_TABLE: &[(EntityKind, &[EntityKind])] = &[
    (EntityKind::Customer, &[]),
    (EntityKind::Address, &[EntityKind::Customer]),
    (EntityKind::Category, &[]),
    (EntityKind::CatalogItem, &[EntityKind::Category]),
    (EntityKind::ShippingAddress, &[]),
    (
        EntityKind::Order,
        &[EntityKind::Customer, EntityKind::ShippingAddress],
    ),
    (
        EntityKind::OrderLine,
        &[EntityKind::Order, EntityKind::CatalogItem],
    ),
    (
        EntityKind::Review,
        &[EntityKind::Customer, EntityKind::CatalogItem],
    ),
    (EntityKind::Report, &[EntityKind::Customer]),
];

static TOPOLOGICAL_ORDER: LazyLock<Vec<EntityKind>> =
    LazyLock::new(|| sort_topologically(DEPENDENCY_TABLE));

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Customer,
        Self::Address,
        Self::Category,
        Self::CatalogItem,
        Self::ShippingAddress,
        Self::Order,
        Self::OrderLine,
        Self::Review,
        Self::Report,
    ];

    /// Returns the display name used in messages and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Address => "Address",
            Self::Category => "Category",
            Self::CatalogItem => "CatalogItem",
            Self::ShippingAddress => "ShippingAddress",
            Self::Order => "Order",
            Self::OrderLine => "OrderLine",
            Self::Review => "Review",
            Self::Report => "Report",
        }
    }

    /// Returns the kind whose factory creates records of this kind, if any.
    ///
    /// Owned kinds cannot be requested on their own.
    #[must_use]
    pub const fn owner(self) -> Option<Self> {
        match self {
            Self::Address => Some(Self::Customer),
            Self::ShippingAddress => Some(Self::Order),
            _ => None,
        }
    }

    /// Returns `true` when a run request may name this kind directly.
    #[must_use]
    pub const fn is_requestable(self) -> bool {
        self.owner().is_none()
    }

    /// Returns `true` when records of this kind have a single-column id.
    ///
    /// Order lines are keyed by their `(catalog item, order)` pair instead.
    #[must_use]
    pub const fn has_identifier(self) -> bool {
        !matches!(self, Self::OrderLine)
    }

    /// Returns the kinds this kind references.
    #[must_use]
    pub fn dependencies(self) -> &'static [Self] {
        match DEPENDENCY_TABLE.iter().find(|(kind, _)| *kind == self) {
            Some((_, dependencies)) => *dependencies,
            None => &[],
        }
    }

    /// Returns this kind's index in [`topological_order`].
    #[must_use]
    pub fn topological_position(self) -> usize {
        TOPOLOGICAL_ORDER
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(usize::MAX)
    }

    /// Every kind a run request may name, in creation order.
    pub fn requestable() -> impl Iterator<Item = Self> {
        topological_order()
            .iter()
            .copied()
            .filter(|kind| kind.is_requestable())
    }
}

/// Returns every kind ordered so that each appears after its dependencies.
#[must_use]
pub fn topological_order() -> &'static [EntityKind] {
    &TOPOLOGICAL_ORDER
}

/// Kahn's algorithm over the declared table, taking the first ready entry
/// in declaration order at each step.
///
/// Entries caught in a cycle are left out; the table is static and a test
/// checks that every kind is placed.
fn sort_topologically(table: &[(EntityKind, &[EntityKind])]) -> Vec<EntityKind> {
    let mut ordered = Vec::with_capacity(table.len());
    let mut remaining = table.to_vec();

    while let Some(ready) = remaining
        .iter()
        .position(|(_, dependencies)| dependencies.iter().all(|dep| ordered.contains(dep)))
    {
        let (kind, _) = remaining.remove(ready);
        ordered.push(kind);
    }

    ordered
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = RunRequestError;

    /// Parses kind names case-insensitively.
    ///
    /// Accepts kebab-case, `snake_case`, the display name, plurals, and the
    /// `product`/`client` aliases used by the storefront itself.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let kind = match normalised.as_str() {
            "customer" | "customers" | "client" | "clients" => Self::Customer,
            "address" | "addresses" => Self::Address,
            "category" | "categories" => Self::Category,
            "catalog-item" | "catalog-items" | "catalogitem" | "product" | "products" => {
                Self::CatalogItem
            }
            "shipping-address" | "shipping-addresses" | "shippingaddress" => {
                Self::ShippingAddress
            }
            "order" | "orders" => Self::Order,
            "order-line" | "order-lines" | "orderline" | "product-order-relation" => {
                Self::OrderLine
            }
            "review" | "reviews" => Self::Review,
            "report" | "reports" => Self::Report,
            _ => {
                return Err(RunRequestError::UnknownKind {
                    name: value.to_owned(),
                });
            }
        };
        Ok(kind)
    }
}

/// Composite key of an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineKey {
    /// Referenced catalog item.
    pub catalog_item_id: Uuid,
    /// Referenced order.
    pub order_id: Uuid,
}
