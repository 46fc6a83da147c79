//! Generated storefront record types.
//!
//! These types are the output of the factories and the input of any store
//! adapter. They are independent of persistence row types so the generation
//! crate never depends on a database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{EntityKind, OrderLineKey};

/// A generated storefront customer.
///
/// `user_name` always equals `email`, and both normalised columns are the
/// upper-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email derived from the name.
    pub email: String,
    /// Login name, identical to the email.
    pub user_name: String,
    /// Upper-cased email.
    pub normalized_email: String,
    /// Upper-cased login name.
    pub normalized_user_name: String,
    /// Opaque password hash placeholder.
    pub password_hash: String,
    /// Whether the email is confirmed. Generated customers are confirmed.
    pub email_confirmed: bool,
}

/// Postal fields shared by customer and shipping addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// Street name.
    pub street: String,
    /// Building number.
    pub building_number: String,
    /// Apartment or suite designation.
    pub apartment_number: String,
    /// Postal code.
    pub postal_code: String,
    /// City or locality.
    pub locality: String,
}

/// The single address attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: Uuid,
    /// Postal fields.
    #[serde(flatten)]
    pub postal: PostalAddress,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Category name.
    pub name: String,
}

/// A sellable catalog item.
///
/// Money is held in minor units. `sale_price_cents` is present exactly when
/// `is_on_sale` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning category.
    pub category_id: Uuid,
    /// Item name.
    pub name: String,
    /// List price in cents.
    pub price_cents: i64,
    /// Marketing description.
    pub description: String,
    /// Units in stock.
    pub quantity: i32,
    /// Product image address.
    pub image_url: String,
    /// Manufacturer.
    pub company: String,
    /// Whether the item is discounted.
    pub is_on_sale: bool,
    /// Discounted price in cents.
    pub sale_price_cents: Option<i64>,
    /// Product page address.
    pub url: String,
}

/// A delivery address owned by exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Postal fields.
    #[serde(flatten)]
    pub postal: PostalAddress,
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, not yet processed.
    Pending,
    /// Delivered and closed.
    Completed,
    /// Handed to the carrier.
    Shipped,
    /// Withdrawn before fulfilment.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in the order they are sampled from.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Completed, Self::Shipped, Self::Cancelled];

    /// Returns the stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Shipped => "Shipped",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Ordering customer, absent when no customers exist.
    pub customer_id: Option<Uuid>,
    /// The shipping address created for this order alone.
    pub shipping_address_id: Uuid,
    /// Fulfilment state.
    pub status: OrderStatus,
    /// Order total in cents.
    pub value_cents: i64,
    /// When the order was placed.
    pub ordered_at: DateTime<Utc>,
    /// Whether the order was confirmed.
    pub order_confirmed: bool,
    /// Whether completion was confirmed.
    pub completion_confirmed: bool,
}

/// A catalog item's quantity within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRecord {
    /// Referenced catalog item.
    pub catalog_item_id: Uuid,
    /// Referenced order.
    pub order_id: Uuid,
    /// Units ordered.
    pub quantity: Option<i32>,
}

impl OrderLineRecord {
    /// Returns the composite key of this line.
    #[must_use]
    pub const fn key(&self) -> OrderLineKey {
        OrderLineKey {
            catalog_item_id: self.catalog_item_id,
            order_id: self.order_id,
        }
    }
}

/// A customer's review of a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Reviewing customer.
    pub customer_id: Uuid,
    /// Reviewed item.
    pub catalog_item_id: Uuid,
    /// Review text.
    pub comment: String,
    /// Star rating, 1 to 5.
    pub rating: i32,
}

/// A customer support report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Reporting customer.
    pub customer_id: Uuid,
    /// Report title.
    pub title: String,
    /// Report body.
    pub description: String,
    /// Whether support has answered.
    pub answered: bool,
}

/// All records of one kind produced by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "kebab-case")]
pub enum RecordBatch {
    /// Customer records.
    Customers(Vec<CustomerRecord>),
    /// Customer address records.
    Addresses(Vec<AddressRecord>),
    /// Category records.
    Categories(Vec<CategoryRecord>),
    /// Catalog item records.
    CatalogItems(Vec<CatalogItemRecord>),
    /// Shipping address records.
    ShippingAddresses(Vec<ShippingAddressRecord>),
    /// Order records.
    Orders(Vec<OrderRecord>),
    /// Order line records.
    OrderLines(Vec<OrderLineRecord>),
    /// Review records.
    Reviews(Vec<ReviewRecord>),
    /// Report records.
    Reports(Vec<ReportRecord>),
}

impl RecordBatch {
    /// Returns the entity kind held by this batch.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Customers(_) => EntityKind::Customer,
            Self::Addresses(_) => EntityKind::Address,
            Self::Categories(_) => EntityKind::Category,
            Self::CatalogItems(_) => EntityKind::CatalogItem,
            Self::ShippingAddresses(_) => EntityKind::ShippingAddress,
            Self::Orders(_) => EntityKind::Order,
            Self::OrderLines(_) => EntityKind::OrderLine,
            Self::Reviews(_) => EntityKind::Review,
            Self::Reports(_) => EntityKind::Report,
        }
    }

    /// Returns the number of records in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Customers(records) => records.len(),
            Self::Addresses(records) => records.len(),
            Self::Categories(records) => records.len(),
            Self::CatalogItems(records) => records.len(),
            Self::ShippingAddresses(records) => records.len(),
            Self::Orders(records) => records.len(),
            Self::OrderLines(records) => records.len(),
            Self::Reviews(records) => records.len(),
            Self::Reports(records) => records.len(),
        }
    }

    /// Returns `true` when the batch holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the identifiers of the records in the batch.
    ///
    /// Order lines have no single-column identifier and yield nothing; use
    /// [`RecordBatch::order_line_keys`] for them.
    #[must_use]
    pub fn ids(&self) -> Vec<Uuid> {
        match self {
            Self::Customers(records) => records.iter().map(|r| r.id).collect(),
            Self::Addresses(records) => records.iter().map(|r| r.id).collect(),
            Self::Categories(records) => records.iter().map(|r| r.id).collect(),
            Self::CatalogItems(records) => records.iter().map(|r| r.id).collect(),
            Self::ShippingAddresses(records) => records.iter().map(|r| r.id).collect(),
            Self::Orders(records) => records.iter().map(|r| r.id).collect(),
            Self::OrderLines(_) => Vec::new(),
            Self::Reviews(records) => records.iter().map(|r| r.id).collect(),
            Self::Reports(records) => records.iter().map(|r| r.id).collect(),
        }
    }

    /// Returns the composite keys of an order line batch, or nothing for
    /// any other kind.
    #[must_use]
    pub fn order_line_keys(&self) -> Vec<OrderLineKey> {
        match self {
            Self::OrderLines(records) => records.iter().map(OrderLineRecord::key).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item: u128, order: u128) -> OrderLineRecord {
        OrderLineRecord {
            catalog_item_id: Uuid::from_u128(item),
            order_id: Uuid::from_u128(order),
            quantity: Some(1),
        }
    }

    #[test]
    fn batch_reports_kind_and_length() {
        let batch = RecordBatch::Categories(vec![CategoryRecord {
            id: Uuid::from_u128(1),
            name: "Books".to_owned(),
        }]);

        assert_eq!(batch.kind(), EntityKind::Category);
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
        assert_eq!(batch.ids(), vec![Uuid::from_u128(1)]);
    }

    #[test]
    fn order_lines_expose_keys_not_ids() {
        let batch = RecordBatch::OrderLines(vec![line(1, 2), line(3, 2)]);

        assert!(batch.ids().is_empty());
        assert_eq!(
            batch.order_line_keys(),
            vec![
                OrderLineKey {
                    catalog_item_id: Uuid::from_u128(1),
                    order_id: Uuid::from_u128(2),
                },
                OrderLineKey {
                    catalog_item_id: Uuid::from_u128(3),
                    order_id: Uuid::from_u128(2),
                },
            ]
        );
    }

    #[test]
    fn batch_serialises_with_kind_tag() {
        let batch = RecordBatch::OrderLines(vec![line(1, 2)]);
        let json = serde_json::to_value(&batch).expect("serialise");

        assert_eq!(json["kind"], "order-lines");
        assert_eq!(json["records"][0]["quantity"], 1);
    }

    #[test]
    fn order_status_labels_match_storage() {
        let labels: Vec<_> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(labels, ["Pending", "Completed", "Shipped", "Cancelled"]);
    }
}
