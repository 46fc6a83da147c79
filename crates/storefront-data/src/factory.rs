//! Per-kind record factories.
//!
//! Each factory builds fully populated records from a [`ValueProvider`] and
//! the identifier sets in [`DependencyLookups`]. A factory that needs a
//! non-empty identifier set and finds it empty raises
//! [`GenerationError::UnsatisfiedDependency`] rather than skipping records;
//! the generator decides whether to provision the missing kind.
//!
//! Owned records travel with their owner: every customer carries one
//! address, and every order one freshly created shipping address.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use uuid::Uuid;

use crate::entity::{EntityKind, IdSet, OrderLineKey};
use crate::error::GenerationError;
use crate::lookups::DependencyLookups;
use crate::records::{
    AddressRecord, CatalogItemRecord, CategoryRecord, CustomerRecord, OrderLineRecord,
    OrderRecord, OrderStatus, PostalAddress, RecordBatch, ReportRecord, ReviewRecord,
    ShippingAddressRecord,
};
use crate::sampling::{pick_one, sample_distinct};
use crate::values::{TextKind, ValueProvider};

/// Catalog item list price, 10.00 to 1000.00.
const ITEM_PRICE_CENTS: RangeInclusive<i64> = 1_000..=100_000;

/// Units in stock per catalog item.
const ITEM_STOCK: RangeInclusive<i32> = 1..=100;

/// Order total, 100.00 to 100000.00.
const ORDER_VALUE_CENTS: RangeInclusive<i64> = 10_000..=10_000_000;

/// How far back order dates may reach.
const ORDER_HISTORY_YEARS: u32 = 5;

/// Upper bound on distinct catalog items linked to one order.
const MAX_LINES_PER_ORDER: usize = 5;

/// Units per order line.
const LINE_QUANTITY: RangeInclusive<i32> = 1..=5;

/// Review star rating.
const RATING: RangeInclusive<i32> = 1..=5;

/// Disambiguating suffix appended to generated email local parts.
const EMAIL_SUFFIX: RangeInclusive<i32> = 1..=999;

/// Builds `count` records of `kind`, plus any owned records they carry.
///
/// Returns one batch per kind produced. Owned kinds are emitted by their
/// owner's factory, so asking for them directly yields no batches.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] when a required
/// identifier set is empty, or propagates provider failures.
///
/// # Example
///
/// ```
/// use storefront_data::{DependencyLookups, EntityKind, FakeValueProvider, build};
///
/// let mut provider = FakeValueProvider::from_seed(1);
/// let batches = build(EntityKind::Customer, 2, &DependencyLookups::new(), &mut provider)
///     .expect("customers need nothing");
///
/// let kinds: Vec<_> = batches.iter().map(|batch| batch.kind()).collect();
/// assert_eq!(kinds, [EntityKind::Customer, EntityKind::Address]);
/// ```
pub fn build(
    kind: EntityKind,
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<RecordBatch>, GenerationError> {
    match kind {
        EntityKind::Customer => {
            let (customers, addresses) = build_customers(count, provider)?;
            Ok(vec![
                RecordBatch::Customers(customers),
                RecordBatch::Addresses(addresses),
            ])
        }
        EntityKind::Category => Ok(vec![RecordBatch::Categories(build_categories(
            count, provider,
        )?)]),
        EntityKind::CatalogItem => Ok(vec![RecordBatch::CatalogItems(build_catalog_items(
            count, lookups, provider,
        )?)]),
        EntityKind::Order => {
            let (shipping, orders) = build_orders(count, lookups, provider)?;
            Ok(vec![
                RecordBatch::ShippingAddresses(shipping),
                RecordBatch::Orders(orders),
            ])
        }
        EntityKind::OrderLine => Ok(vec![RecordBatch::OrderLines(build_order_lines(
            count, lookups, provider,
        )?)]),
        EntityKind::Review => Ok(vec![RecordBatch::Reviews(build_reviews(
            count, lookups, provider,
        )?)]),
        EntityKind::Report => Ok(vec![RecordBatch::Reports(build_reports(
            count, lookups, provider,
        )?)]),
        EntityKind::Address | EntityKind::ShippingAddress => Ok(Vec::new()),
    }
}

/// Builds customers, each with exactly one address.
///
/// The email is derived from the generated name and the login name copies
/// it, so `user_name == email` and both normalised columns are the
/// upper-cased email.
///
/// # Errors
///
/// Propagates provider failures.
pub fn build_customers(
    count: usize,
    provider: &mut dyn ValueProvider,
) -> Result<(Vec<CustomerRecord>, Vec<AddressRecord>), GenerationError> {
    let mut customers = Vec::with_capacity(count);
    let mut addresses = Vec::with_capacity(count);

    for _ in 0..count {
        let id = provider.identifier()?;
        let first_name = provider.text(TextKind::FirstName)?;
        let last_name = provider.text(TextKind::LastName)?;
        let suffix = provider.integer(EMAIL_SUFFIX)?;
        let domain = provider.text(TextKind::EmailProvider)?;
        let email = derive_email(&first_name, &last_name, suffix, &domain);
        let normalized = email.to_uppercase();

        addresses.push(AddressRecord {
            id: provider.identifier()?,
            customer_id: id,
            postal: postal_address(provider)?,
        });
        customers.push(CustomerRecord {
            id,
            first_name,
            last_name,
            user_name: email.clone(),
            normalized_user_name: normalized.clone(),
            normalized_email: normalized,
            email,
            password_hash: provider.text(TextKind::Password)?,
            email_confirmed: true,
        });
    }

    Ok((customers, addresses))
}

/// Builds catalog categories.
///
/// # Errors
///
/// Propagates provider failures.
pub fn build_categories(
    count: usize,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<CategoryRecord>, GenerationError> {
    let mut categories = Vec::with_capacity(count);
    for _ in 0..count {
        categories.push(CategoryRecord {
            id: provider.identifier()?,
            name: provider.text(TextKind::CategoryName)?,
        });
    }
    Ok(categories)
}

/// Builds catalog items, each in a uniformly chosen known category.
///
/// Sale prices are 90% of the list price, rounded down to the cent, and
/// present only for items on sale.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] for
/// [`EntityKind::Category`] when no category is known, or propagates
/// provider failures.
pub fn build_catalog_items(
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<CatalogItemRecord>, GenerationError> {
    let categories = required_ids(lookups, EntityKind::Category)?;
    let mut items = Vec::with_capacity(count);

    for _ in 0..count {
        let id = provider.identifier()?;
        let category_id = pick_id(provider, &categories, EntityKind::Category)?;
        let name = provider.text(TextKind::ProductName)?;
        let price_cents = provider.amount_cents(ITEM_PRICE_CENTS)?;
        let is_on_sale = provider.boolean()?;

        items.push(CatalogItemRecord {
            id,
            category_id,
            name,
            price_cents,
            description: provider.text(TextKind::Paragraph)?,
            quantity: provider.integer(ITEM_STOCK)?,
            image_url: provider.text(TextKind::ImageUrl)?,
            company: provider.text(TextKind::CompanyName)?,
            is_on_sale,
            sale_price_cents: is_on_sale.then_some(sale_price(price_cents)),
            url: provider.text(TextKind::Url)?,
        });
    }

    Ok(items)
}

/// Builds orders together with one new shipping address per order.
///
/// Customers are drawn uniformly from the known set; with no customers the
/// orders are left without one.
///
/// # Errors
///
/// Propagates provider failures.
pub fn build_orders(
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<(Vec<ShippingAddressRecord>, Vec<OrderRecord>), GenerationError> {
    let customers: Vec<Uuid> = lookups.ids(EntityKind::Customer).iter().copied().collect();
    let mut shipping = Vec::with_capacity(count);
    let mut orders = Vec::with_capacity(count);

    for _ in 0..count {
        let address = ShippingAddressRecord {
            id: provider.identifier()?,
            postal: postal_address(provider)?,
        };
        let status = pick_one(provider, &OrderStatus::ALL)?.unwrap_or(OrderStatus::Pending);

        orders.push(OrderRecord {
            id: provider.identifier()?,
            customer_id: pick_one(provider, &customers)?,
            shipping_address_id: address.id,
            status,
            value_cents: provider.amount_cents(ORDER_VALUE_CENTS)?,
            ordered_at: provider.date_in_past(ORDER_HISTORY_YEARS)?,
            order_confirmed: provider.boolean()?,
            completion_confirmed: provider.boolean()?,
        });
        shipping.push(address);
    }

    Ok((shipping, orders))
}

/// Links catalog items to orders.
///
/// Orders generated in this run are all linked and `count` is ignored.
/// Otherwise `count` distinct existing orders are sampled from those that
/// still have an unlinked item. Each target order gets between one and five
/// distinct items it is not already linked to.
///
/// Existing pairs are grouped by order up front, so the work per target
/// order depends on its own lines rather than on the size of the catalog.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] for
/// [`EntityKind::CatalogItem`] when no item is known, or for
/// [`EntityKind::Order`] when no order can take another line. Propagates
/// provider failures.
pub fn build_order_lines(
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<OrderLineRecord>, GenerationError> {
    let items = required_ids(lookups, EntityKind::CatalogItem)?;
    let known_items = lookups.ids(EntityKind::CatalogItem);
    let linked = linked_items_by_order(lookups.order_lines(), known_items);

    let in_run = lookups.generated_ids(EntityKind::Order);
    let targets: Vec<Uuid> = if in_run.is_empty() {
        let eligible: Vec<Uuid> = lookups
            .ids(EntityKind::Order)
            .iter()
            .copied()
            .filter(|order_id| linked.get(order_id).map_or(0, BTreeSet::len) < items.len())
            .collect();
        if eligible.is_empty() {
            return Err(GenerationError::unsatisfied(EntityKind::Order));
        }
        sample_distinct(provider, &eligible, count)?
    } else {
        in_run.iter().copied().collect()
    };

    let mut lines = Vec::new();
    for order_id in targets {
        let taken = linked.get(&order_id);
        let taken_count = taken.map_or(0, BTreeSet::len);
        let most = items
            .len()
            .saturating_sub(taken_count)
            .min(MAX_LINES_PER_ORDER);
        if most == 0 {
            continue;
        }
        let size = provider.pick_index(most)?.saturating_add(1);
        // Over-draw by the taken count, then drop taken items; what remains
        // is a uniform sample of the free items.
        let drawn = sample_distinct(provider, &items, size.saturating_add(taken_count))?;
        let free = drawn
            .into_iter()
            .filter(|item| taken.is_none_or(|set| !set.contains(item)))
            .take(size);
        for catalog_item_id in free {
            lines.push(OrderLineRecord {
                catalog_item_id,
                order_id,
                quantity: Some(provider.integer(LINE_QUANTITY)?),
            });
        }
    }

    Ok(lines)
}

/// Groups known pairs by order, keeping only items still in the catalog.
fn linked_items_by_order(
    pairs: &BTreeSet<OrderLineKey>,
    known_items: &IdSet,
) -> BTreeMap<Uuid, BTreeSet<Uuid>> {
    let mut linked: BTreeMap<Uuid, BTreeSet<Uuid>> = BTreeMap::new();
    for pair in pairs {
        if known_items.contains(&pair.catalog_item_id) {
            linked
                .entry(pair.order_id)
                .or_default()
                .insert(pair.catalog_item_id);
        }
    }
    linked
}

/// Builds reviews by uniformly chosen customers of uniformly chosen items.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] when no customer or no
/// catalog item is known, or propagates provider failures.
pub fn build_reviews(
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<ReviewRecord>, GenerationError> {
    let customers = required_ids(lookups, EntityKind::Customer)?;
    let items = required_ids(lookups, EntityKind::CatalogItem)?;

    let mut reviews = Vec::with_capacity(count);
    for _ in 0..count {
        reviews.push(ReviewRecord {
            id: provider.identifier()?,
            customer_id: pick_id(provider, &customers, EntityKind::Customer)?,
            catalog_item_id: pick_id(provider, &items, EntityKind::CatalogItem)?,
            comment: provider.text(TextKind::Sentence)?,
            rating: provider.integer(RATING)?,
        });
    }
    Ok(reviews)
}

/// Builds support reports by uniformly chosen customers.
///
/// Titles are provider sentences, so reports never read the catalog.
///
/// # Errors
///
/// Returns [`GenerationError::UnsatisfiedDependency`] when no customer is
/// known, or propagates provider failures.
pub fn build_reports(
    count: usize,
    lookups: &DependencyLookups,
    provider: &mut dyn ValueProvider,
) -> Result<Vec<ReportRecord>, GenerationError> {
    let customers = required_ids(lookups, EntityKind::Customer)?;

    let mut reports = Vec::with_capacity(count);
    for _ in 0..count {
        reports.push(ReportRecord {
            id: provider.identifier()?,
            customer_id: pick_id(provider, &customers, EntityKind::Customer)?,
            title: provider.text(TextKind::Sentence)?,
            description: provider.text(TextKind::Sentence)?,
            answered: provider.boolean()?,
        });
    }
    Ok(reports)
}

fn required_ids(
    lookups: &DependencyLookups,
    kind: EntityKind,
) -> Result<Vec<Uuid>, GenerationError> {
    let ids = lookups.ids(kind);
    if ids.is_empty() {
        return Err(GenerationError::unsatisfied(kind));
    }
    Ok(ids.iter().copied().collect())
}

fn pick_id(
    provider: &mut dyn ValueProvider,
    ids: &[Uuid],
    kind: EntityKind,
) -> Result<Uuid, GenerationError> {
    pick_one(provider, ids)?.ok_or(GenerationError::UnsatisfiedDependency { kind })
}

fn postal_address(provider: &mut dyn ValueProvider) -> Result<PostalAddress, GenerationError> {
    Ok(PostalAddress {
        street: provider.text(TextKind::Street)?,
        building_number: provider.text(TextKind::BuildingNumber)?,
        apartment_number: provider.text(TextKind::SecondaryAddress)?,
        postal_code: provider.text(TextKind::PostalCode)?,
        locality: provider.text(TextKind::City)?,
    })
}

/// Lower-cases the name parts and drops anything that is not an ASCII
/// letter or digit, so "O'Neil" becomes "oneil".
fn derive_email(first: &str, last: &str, suffix: i32, domain: &str) -> String {
    format!(
        "{}.{}{suffix}@{}",
        email_part(first),
        email_part(last),
        domain.to_ascii_lowercase()
    )
}

fn email_part(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

const fn sale_price(price_cents: i64) -> i64 {
    price_cents.saturating_mul(9).div_euclid(10)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use rstest::{fixture, rstest};

    use super::*;
    use crate::values::FakeValueProvider;

    /// Generous ceiling for linking runs that used to scale with
    /// orders times catalog items.
    const LINKING_BUDGET: Duration = Duration::from_secs(5);

    #[fixture]
    fn provider() -> FakeValueProvider {
        FakeValueProvider::from_seed(1234)
    }

    fn ids(range: std::ops::Range<u128>) -> IdSet {
        range.map(Uuid::from_u128).collect()
    }

    #[rstest]
    fn customers_have_consistent_credentials(mut provider: FakeValueProvider) {
        let (customers, addresses) = build_customers(25, &mut provider).expect("customers");

        assert_eq!(customers.len(), 25);
        for customer in &customers {
            assert_eq!(customer.user_name, customer.email);
            assert_eq!(customer.normalized_email, customer.email.to_uppercase());
            assert_eq!(customer.normalized_user_name, customer.normalized_email);
            assert!(customer.email.contains('@'));
            assert!(customer.email_confirmed);
        }
        let owners: BTreeSet<_> = addresses.iter().map(|a| a.customer_id).collect();
        let customer_ids: BTreeSet<_> = customers.iter().map(|c| c.id).collect();
        assert_eq!(owners, customer_ids);
        assert_eq!(addresses.len(), customers.len());
    }

    #[rstest]
    fn catalog_items_need_a_category(mut provider: FakeValueProvider) {
        let result = build_catalog_items(3, &DependencyLookups::new(), &mut provider);
        assert_eq!(
            result,
            Err(GenerationError::unsatisfied(EntityKind::Category))
        );
    }

    #[rstest]
    fn catalog_items_reference_known_categories(mut provider: FakeValueProvider) {
        let categories = ids(1..4);
        let lookups =
            DependencyLookups::new().with_existing(EntityKind::Category, categories.clone());

        let items = build_catalog_items(40, &lookups, &mut provider).expect("items");

        for item in &items {
            assert!(categories.contains(&item.category_id));
            assert_eq!(item.sale_price_cents.is_some(), item.is_on_sale);
            assert!(ITEM_PRICE_CENTS.contains(&item.price_cents));
            if let Some(sale) = item.sale_price_cents {
                assert!(sale < item.price_cents);
            }
        }
    }

    #[rstest]
    fn orders_own_fresh_shipping_addresses(mut provider: FakeValueProvider) {
        let lookups = DependencyLookups::new().with_existing(EntityKind::Customer, ids(1..3));

        let (shipping, orders) = build_orders(10, &lookups, &mut provider).expect("orders");

        let referenced: BTreeSet<_> = orders.iter().map(|o| o.shipping_address_id).collect();
        let created: BTreeSet<_> = shipping.iter().map(|s| s.id).collect();
        assert_eq!(referenced.len(), orders.len());
        assert_eq!(referenced, created);
        assert!(orders.iter().all(|o| o.customer_id.is_some()));
    }

    #[rstest]
    fn orders_tolerate_missing_customers(mut provider: FakeValueProvider) {
        let (_, orders) =
            build_orders(3, &DependencyLookups::new(), &mut provider).expect("orders");
        assert!(orders.iter().all(|o| o.customer_id.is_none()));
    }

    #[rstest]
    fn in_run_orders_each_get_lines(mut provider: FakeValueProvider) {
        let mut lookups = DependencyLookups::new().with_existing(EntityKind::CatalogItem, ids(1..9));
        let (shipping, orders) = build_orders(4, &lookups, &mut provider).expect("orders");
        lookups.absorb(&RecordBatch::ShippingAddresses(shipping));
        lookups.absorb(&RecordBatch::Orders(orders.clone()));

        let lines = build_order_lines(1, &lookups, &mut provider).expect("lines");

        for order in &orders {
            let per_order = lines.iter().filter(|l| l.order_id == order.id).count();
            assert!((1..=MAX_LINES_PER_ORDER).contains(&per_order));
        }
        let keys: BTreeSet<_> = lines.iter().map(OrderLineRecord::key).collect();
        assert_eq!(keys.len(), lines.len());
    }

    #[rstest]
    fn existing_pairs_are_never_duplicated(mut provider: FakeValueProvider) {
        let order = Uuid::from_u128(100);
        let taken = OrderLineKey {
            catalog_item_id: Uuid::from_u128(1),
            order_id: order,
        };
        let lookups = DependencyLookups::new()
            .with_existing(EntityKind::CatalogItem, ids(1..3))
            .with_existing(EntityKind::Order, IdSet::from([order]))
            .with_order_lines(BTreeSet::from([taken]));

        let lines = build_order_lines(2, &lookups, &mut provider).expect("lines");

        assert_eq!(lines.len(), 1);
        assert!(lines.iter().all(|line| line.key() != taken));
    }

    #[rstest]
    fn large_catalogs_link_fresh_orders_quickly(mut provider: FakeValueProvider) {
        let mut lookups =
            DependencyLookups::new().with_existing(EntityKind::CatalogItem, ids(0..200_000));
        let (shipping, orders) = build_orders(5_000, &lookups, &mut provider).expect("orders");
        lookups.absorb(&RecordBatch::ShippingAddresses(shipping));
        lookups.absorb(&RecordBatch::Orders(orders));

        let started = Instant::now();
        let lines = build_order_lines(1, &lookups, &mut provider).expect("lines");

        assert!(started.elapsed() < LINKING_BUDGET, "took {:?}", started.elapsed());
        let linked_orders: BTreeSet<_> = lines.iter().map(|line| line.order_id).collect();
        assert_eq!(linked_orders.len(), 5_000);
    }

    #[rstest]
    fn many_partly_linked_orders_are_sampled_quickly(mut provider: FakeValueProvider) {
        const ORDERS: u128 = 20_000;
        let order_id = |n: u128| Uuid::from_u128(1_000_000 + n);
        let existing: BTreeSet<_> = (0..ORDERS)
            .map(|n| OrderLineKey {
                catalog_item_id: Uuid::from_u128(n),
                order_id: order_id(n),
            })
            .collect();
        let lookups = DependencyLookups::new()
            .with_existing(EntityKind::CatalogItem, ids(0..ORDERS))
            .with_existing(EntityKind::Order, (0..ORDERS).map(order_id).collect())
            .with_order_lines(existing.clone());

        let started = Instant::now();
        let lines = build_order_lines(20_000, &lookups, &mut provider).expect("lines");

        assert!(started.elapsed() < LINKING_BUDGET, "took {:?}", started.elapsed());
        let linked_orders: BTreeSet<_> = lines.iter().map(|line| line.order_id).collect();
        assert_eq!(linked_orders.len(), 20_000);
        assert!(lines.iter().all(|line| !existing.contains(&line.key())));
    }

    #[rstest]
    fn reports_need_customers_only(mut provider: FakeValueProvider) {
        let lookups = DependencyLookups::new().with_existing(EntityKind::Customer, ids(1..4));

        let reports = build_reports(6, &lookups, &mut provider).expect("reports");

        assert_eq!(reports.len(), 6);
        assert!(reports.iter().all(|report| !report.title.is_empty()));
        assert!(
            reports
                .iter()
                .all(|report| lookups.ids(EntityKind::Customer).contains(&report.customer_id))
        );
    }

    #[rstest]
    fn fully_linked_orders_are_unsatisfied(mut provider: FakeValueProvider) {
        let order = Uuid::from_u128(100);
        let lookups = DependencyLookups::new()
            .with_existing(EntityKind::CatalogItem, ids(1..2))
            .with_existing(EntityKind::Order, IdSet::from([order]))
            .with_order_lines(BTreeSet::from([OrderLineKey {
                catalog_item_id: Uuid::from_u128(1),
                order_id: order,
            }]));

        assert_eq!(
            build_order_lines(1, &lookups, &mut provider),
            Err(GenerationError::unsatisfied(EntityKind::Order))
        );
    }

    #[rstest]
    fn reviews_rate_within_range(mut provider: FakeValueProvider) {
        let lookups = DependencyLookups::new()
            .with_existing(EntityKind::Customer, ids(1..3))
            .with_existing(EntityKind::CatalogItem, ids(10..12));

        let reviews = build_reviews(50, &lookups, &mut provider).expect("reviews");

        assert!(reviews.iter().all(|r| RATING.contains(&r.rating)));
    }

    #[rstest]
    #[case(EntityKind::Review)]
    #[case(EntityKind::Report)]
    fn customer_backed_kinds_need_customers(
        mut provider: FakeValueProvider,
        #[case] kind: EntityKind,
    ) {
        let lookups = DependencyLookups::new().with_existing(EntityKind::CatalogItem, ids(1..2));
        assert_eq!(
            build(kind, 1, &lookups, &mut provider),
            Err(GenerationError::unsatisfied(EntityKind::Customer))
        );
    }

    #[rstest]
    #[case(EntityKind::Address)]
    #[case(EntityKind::ShippingAddress)]
    fn owned_kinds_build_nothing(mut provider: FakeValueProvider, #[case] kind: EntityKind) {
        let batches = build(kind, 3, &DependencyLookups::new(), &mut provider).expect("build");
        assert!(batches.is_empty());
    }

    #[rstest]
    #[case("Mary", "O'Neil", 7, "Example.COM", "mary.oneil7@example.com")]
    #[case("José", "Núñez", 12, "mail.org", "jos.nez12@mail.org")]
    fn emails_derive_from_names(
        #[case] first: &str,
        #[case] last: &str,
        #[case] suffix: i32,
        #[case] domain: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(derive_email(first, last, suffix, domain), expected);
    }

    #[test]
    fn sale_price_rounds_down() {
        assert_eq!(sale_price(1_999), 1_799);
        assert_eq!(sale_price(100_000), 90_000);
    }
}
