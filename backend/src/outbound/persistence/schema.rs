//! Diesel table definitions for the storefront schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered storefront customers.
    customers (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Login email; also used as the user name.
        email -> Varchar,
        user_name -> Varchar,
        normalized_email -> Varchar,
        normalized_user_name -> Varchar,
        password_hash -> Varchar,
        email_confirmed -> Bool,
    }
}

diesel::table! {
    /// Postal address owned by exactly one customer.
    addresses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning customer (unique).
        customer_id -> Uuid,
        street -> Varchar,
        building_number -> Varchar,
        apartment_number -> Varchar,
        postal_code -> Varchar,
        locality -> Varchar,
    }
}

diesel::table! {
    /// Catalog categories.
    categories (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Sellable catalog items.
    ///
    /// Prices are stored in minor units. `sale_price_cents` is set exactly
    /// when `is_on_sale` is true.
    catalog_items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        category_id -> Uuid,
        name -> Varchar,
        price_cents -> Int8,
        description -> Text,
        quantity -> Int4,
        image_url -> Varchar,
        company -> Varchar,
        is_on_sale -> Bool,
        sale_price_cents -> Nullable<Int8>,
        url -> Varchar,
    }
}

diesel::table! {
    /// Delivery address owned by exactly one order.
    shipping_addresses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        street -> Varchar,
        building_number -> Varchar,
        apartment_number -> Varchar,
        postal_code -> Varchar,
        locality -> Varchar,
    }
}

diesel::table! {
    /// Customer orders.
    orders (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Ordering customer; null for guest orders.
        customer_id -> Nullable<Uuid>,
        /// Delivery address (unique).
        shipping_address_id -> Uuid,
        status -> Varchar,
        value_cents -> Int8,
        ordered_at -> Timestamptz,
        order_confirmed -> Bool,
        completion_confirmed -> Bool,
    }
}

diesel::table! {
    /// Items contained in an order, keyed by the `(item, order)` pair.
    order_lines (catalog_item_id, order_id) {
        catalog_item_id -> Uuid,
        order_id -> Uuid,
        quantity -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Customer reviews of catalog items.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        customer_id -> Uuid,
        catalog_item_id -> Uuid,
        comment -> Text,
        /// Star rating between 1 and 5 inclusive.
        rating -> Int4,
    }
}

diesel::table! {
    /// Support reports raised by customers.
    reports (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        customer_id -> Uuid,
        title -> Varchar,
        description -> Text,
        answered -> Bool,
    }
}

diesel::joinable!(addresses -> customers (customer_id));
diesel::joinable!(catalog_items -> categories (category_id));
diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(orders -> shipping_addresses (shipping_address_id));
diesel::joinable!(order_lines -> catalog_items (catalog_item_id));
diesel::joinable!(order_lines -> orders (order_id));
diesel::joinable!(reviews -> catalog_items (catalog_item_id));
diesel::joinable!(reviews -> customers (customer_id));
diesel::joinable!(reports -> customers (customer_id));

diesel::allow_tables_to_appear_in_same_query!(
    addresses,
    catalog_items,
    categories,
    customers,
    order_lines,
    orders,
    reports,
    reviews,
    shipping_addresses,
);
