//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Rows borrow from the generated records so
//! a batch is inserted without cloning its strings.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use storefront_data::{
    AddressRecord, CatalogItemRecord, CategoryRecord, CustomerRecord, OrderLineRecord,
    OrderRecord, ReportRecord, ReviewRecord, ShippingAddressRecord,
};
use uuid::Uuid;

use super::schema::{
    addresses, catalog_items, categories, customers, order_lines, orders, reports, reviews,
    shipping_addresses,
};

/// Insertable struct for the customers table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub user_name: &'a str,
    pub normalized_email: &'a str,
    pub normalized_user_name: &'a str,
    pub password_hash: &'a str,
    pub email_confirmed: bool,
}

impl<'a> From<&'a CustomerRecord> for NewCustomerRow<'a> {
    fn from(record: &'a CustomerRecord) -> Self {
        Self {
            id: record.id,
            first_name: &record.first_name,
            last_name: &record.last_name,
            email: &record.email,
            user_name: &record.user_name,
            normalized_email: &record.normalized_email,
            normalized_user_name: &record.normalized_user_name,
            password_hash: &record.password_hash,
            email_confirmed: record.email_confirmed,
        }
    }
}

/// Insertable struct for the addresses table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub street: &'a str,
    pub building_number: &'a str,
    pub apartment_number: &'a str,
    pub postal_code: &'a str,
    pub locality: &'a str,
}

impl<'a> From<&'a AddressRecord> for NewAddressRow<'a> {
    fn from(record: &'a AddressRecord) -> Self {
        let postal = &record.postal;
        Self {
            id: record.id,
            customer_id: record.customer_id,
            street: &postal.street,
            building_number: &postal.building_number,
            apartment_number: &postal.apartment_number,
            postal_code: &postal.postal_code,
            locality: &postal.locality,
        }
    }
}

/// Insertable struct for the categories table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

impl<'a> From<&'a CategoryRecord> for NewCategoryRow<'a> {
    fn from(record: &'a CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: &record.name,
        }
    }
}

/// Insertable struct for the catalog_items table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalog_items)]
pub(crate) struct NewCatalogItemRow<'a> {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: &'a str,
    pub price_cents: i64,
    pub description: &'a str,
    pub quantity: i32,
    pub image_url: &'a str,
    pub company: &'a str,
    pub is_on_sale: bool,
    pub sale_price_cents: Option<i64>,
    pub url: &'a str,
}

impl<'a> From<&'a CatalogItemRecord> for NewCatalogItemRow<'a> {
    fn from(record: &'a CatalogItemRecord) -> Self {
        Self {
            id: record.id,
            category_id: record.category_id,
            name: &record.name,
            price_cents: record.price_cents,
            description: &record.description,
            quantity: record.quantity,
            image_url: &record.image_url,
            company: &record.company,
            is_on_sale: record.is_on_sale,
            sale_price_cents: record.sale_price_cents,
            url: &record.url,
        }
    }
}

/// Insertable struct for the shipping_addresses table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shipping_addresses)]
pub(crate) struct NewShippingAddressRow<'a> {
    pub id: Uuid,
    pub street: &'a str,
    pub building_number: &'a str,
    pub apartment_number: &'a str,
    pub postal_code: &'a str,
    pub locality: &'a str,
}

impl<'a> From<&'a ShippingAddressRecord> for NewShippingAddressRow<'a> {
    fn from(record: &'a ShippingAddressRecord) -> Self {
        let postal = &record.postal;
        Self {
            id: record.id,
            street: &postal.street,
            building_number: &postal.building_number,
            apartment_number: &postal.apartment_number,
            postal_code: &postal.postal_code,
            locality: &postal.locality,
        }
    }
}

/// Insertable struct for the orders table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub shipping_address_id: Uuid,
    pub status: &'static str,
    pub value_cents: i64,
    pub ordered_at: DateTime<Utc>,
    pub order_confirmed: bool,
    pub completion_confirmed: bool,
}

impl From<&OrderRecord> for NewOrderRow {
    fn from(record: &OrderRecord) -> Self {
        Self {
            id: record.id,
            customer_id: record.customer_id,
            shipping_address_id: record.shipping_address_id,
            status: record.status.as_str(),
            value_cents: record.value_cents,
            ordered_at: record.ordered_at,
            order_confirmed: record.order_confirmed,
            completion_confirmed: record.completion_confirmed,
        }
    }
}

/// Insertable struct for the order_lines table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_lines)]
pub(crate) struct NewOrderLineRow {
    pub catalog_item_id: Uuid,
    pub order_id: Uuid,
    pub quantity: Option<i32>,
}

impl From<&OrderLineRecord> for NewOrderLineRow {
    fn from(record: &OrderLineRecord) -> Self {
        Self {
            catalog_item_id: record.catalog_item_id,
            order_id: record.order_id,
            quantity: record.quantity,
        }
    }
}

/// Row struct for reading order-line keys.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = order_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderLineKeyRow {
    pub catalog_item_id: Uuid,
    pub order_id: Uuid,
}

/// Insertable struct for the reviews table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub catalog_item_id: Uuid,
    pub comment: &'a str,
    pub rating: i32,
}

impl<'a> From<&'a ReviewRecord> for NewReviewRow<'a> {
    fn from(record: &'a ReviewRecord) -> Self {
        Self {
            id: record.id,
            customer_id: record.customer_id,
            catalog_item_id: record.catalog_item_id,
            comment: &record.comment,
            rating: record.rating,
        }
    }
}

/// Insertable struct for the reports table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reports)]
pub(crate) struct NewReportRow<'a> {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub answered: bool,
}

impl<'a> From<&'a ReportRecord> for NewReportRow<'a> {
    fn from(record: &'a ReportRecord) -> Self {
        Self {
            id: record.id,
            customer_id: record.customer_id,
            title: &record.title,
            description: &record.description,
            answered: record.answered,
        }
    }
}
