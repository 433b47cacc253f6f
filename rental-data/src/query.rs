//! Derived queries over the stored collections.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use rental_core::{
    ContactRecord, DocumentStore, ProductSummary, Record, RecordDefect, RecordKind, required,
};

/// Products with a non-zero quantity, keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductAvailability {
    /// Available products.
    pub available: BTreeMap<String, ProductSummary>,
    /// Records left out because their fields could not be read.
    pub rejected: Vec<RecordDefect>,
}

/// How a rental lookup decides that a record refers to an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Compare the named key: `rental.product_id == product_id` and
    /// `customer.user_id == user_id`.
    #[default]
    KeyedField,
    /// Match when the identifier equals any field value of the record.
    ///
    /// This reproduces lookups made against legacy data and will report a
    /// false match when an unrelated field happens to hold the identifier.
    AnyValue,
}

impl MatchPolicy {
    fn matches(self, record: &Record, key: &str, value: &str) -> bool {
        match self {
            Self::KeyedField => record.get(key) == Some(value),
            Self::AnyValue => record.contains_value(value),
        }
    }
}

/// Customers renting a product, keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenterLookup {
    /// Contact details of each renter.
    pub renters: BTreeMap<String, ContactRecord>,
    /// Records left out because their fields could not be read.
    pub rejected: Vec<RecordDefect>,
}

/// Scan the product collection for products whose quantity is non-zero.
///
/// Quantities are read as integers of any size; a record with a non-numeric quantity or
/// without one of the reported fields is listed in
/// [`ProductAvailability::rejected`] and the scan carries on. When a product
/// id appears more than once, the last available record wins.
pub fn available_products<S>(store: &S) -> Result<ProductAvailability, S::Error>
where
    S: DocumentStore + ?Sized,
{
    let mut availability = ProductAvailability::default();
    for record in store.find_all(RecordKind::Product)? {
        match available_product(&record) {
            Ok(Some((product_id, summary))) => {
                availability.available.insert(product_id, summary);
            }
            Ok(None) => {}
            Err(defect) => {
                warn!("excluding product from availability: {defect}");
                availability.rejected.push(defect);
            }
        }
    }
    Ok(availability)
}

fn available_product(record: &Record) -> Result<Option<(String, ProductSummary)>, RecordDefect> {
    let product_id = required(record, RecordKind::Product, "product_id")?;
    let summary = ProductSummary::from_record(record)?;
    let available = summary.is_available(&product_id)?;
    Ok(available.then_some((product_id, summary)))
}

/// Find the customers renting `product_id`.
///
/// Rentals referring to the product (per `policy`) contribute their
/// `user_id`; customers matching any of those ids are reported with their
/// contact details. No matching rental, or no matching customer, yields an
/// empty lookup.
pub fn renters_of<S>(
    store: &S,
    product_id: &str,
    policy: MatchPolicy,
) -> Result<RenterLookup, S::Error>
where
    S: DocumentStore + ?Sized,
{
    let mut lookup = RenterLookup::default();
    let mut user_ids = BTreeSet::new();
    for rental in store.find_all(RecordKind::Rental)? {
        if !policy.matches(&rental, "product_id", product_id) {
            continue;
        }
        match required(&rental, RecordKind::Rental, "user_id") {
            Ok(user_id) => {
                user_ids.insert(user_id);
            }
            Err(defect) => reject(&mut lookup, defect),
        }
    }
    if user_ids.is_empty() {
        return Ok(lookup);
    }

    for customer in store.find_all(RecordKind::Customer)? {
        let is_renter = user_ids
            .iter()
            .any(|user_id| policy.matches(&customer, "user_id", user_id));
        if !is_renter {
            continue;
        }
        let contact = required(&customer, RecordKind::Customer, "user_id").and_then(|user_id| {
            ContactRecord::from_record(&customer).map(|contact| (user_id, contact))
        });
        match contact {
            Ok((user_id, contact)) => {
                lookup.renters.insert(user_id, contact);
            }
            Err(defect) => reject(&mut lookup, defect),
        }
    }
    Ok(lookup)
}

fn reject(lookup: &mut RenterLookup, defect: RecordDefect) {
    warn!("excluding record from rental lookup: {defect}");
    lookup.rejected.push(defect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_core::StoreConnector;
    use rental_core::test_support::MemoryStore;
    use rstest::{fixture, rstest};

    fn product(id: &str, quantity: &str) -> Record {
        Record::from_pairs([
            ("product_id", id),
            ("description", "Chair"),
            ("product_type", "diningroom"),
            ("quantity_available", quantity),
        ])
    }

    fn customer(user_id: &str, name: &str) -> Record {
        Record::from_pairs([
            ("user_id", user_id),
            ("name", name),
            ("address", "1 Main St"),
            ("phone_number", "555-0100"),
            ("email", "someone@example.com"),
        ])
    }

    fn rental(user_id: &str, product_id: &str) -> Record {
        Record::from_pairs([("user_id", user_id), ("product_id", product_id)])
    }

    #[fixture]
    fn store() -> MemoryStore {
        let store = MemoryStore::default();
        store.seed(
            RecordKind::Customer,
            [customer("u1", "Ann"), customer("u2", "Bob"), customer("u3", "Cy")],
        );
        store.seed(
            RecordKind::Rental,
            [rental("u1", "p2"), rental("u2", "p2"), rental("u3", "p1")],
        );
        store
    }

    fn availability(store: &MemoryStore) -> ProductAvailability {
        store
            .with_connection(|connection| available_products(&*connection))
            .expect("availability query")
    }

    fn lookup(store: &MemoryStore, product_id: &str, policy: MatchPolicy) -> RenterLookup {
        store
            .with_connection(|connection| renters_of(&*connection, product_id, policy))
            .expect("rental lookup")
    }

    #[rstest]
    fn only_non_zero_quantities_are_available() {
        let store = MemoryStore::default();
        store.seed(
            RecordKind::Product,
            [
                product("p1", "0"),
                product("p2", "3"),
                product("p3", "-1"),
                product("p4", "99999999999999999999"),
            ],
        );

        let result = availability(&store);

        let ids: Vec<_> = result.available.keys().cloned().collect();
        assert_eq!(ids, vec!["p2", "p3", "p4"]);
        assert_eq!(result.available["p2"].quantity_available, "3");
        assert!(result.rejected.is_empty());
    }

    #[rstest]
    fn extra_fields_do_not_change_the_shape() {
        let store = MemoryStore::default();
        let record: Record = product("p2", "3")
            .iter()
            .chain([("warehouse", "north")])
            .collect();
        store.seed(RecordKind::Product, [record]);

        let result = availability(&store);

        assert_eq!(
            result.available["p2"],
            ProductSummary {
                description: "Chair".into(),
                product_type: "diningroom".into(),
                quantity_available: "3".into(),
            }
        );
    }

    #[rstest]
    fn malformed_quantity_rejects_only_that_record() {
        let store = MemoryStore::default();
        store.seed(
            RecordKind::Product,
            [product("p1", "lots"), product("p2", "3")],
        );

        let result = availability(&store);

        assert_eq!(result.available.len(), 1);
        assert!(result.available.contains_key("p2"));
        assert_eq!(
            result.rejected,
            vec![RecordDefect::MalformedQuantity {
                product_id: "p1".into(),
                value: "lots".into(),
            }]
        );
    }

    #[rstest]
    fn missing_product_field_is_rejected() {
        let store = MemoryStore::default();
        store.seed(
            RecordKind::Product,
            [Record::from_pairs([("product_id", "p1"), ("quantity_available", "2")])],
        );

        let result = availability(&store);

        assert!(result.available.is_empty());
        assert_eq!(
            result.rejected,
            vec![RecordDefect::MissingField {
                kind: RecordKind::Product,
                field: "description",
            }]
        );
    }

    #[rstest]
    fn unavailable_duplicate_keeps_earlier_entry() {
        let store = MemoryStore::default();
        store.seed(RecordKind::Product, [product("p1", "2"), product("p1", "0")]);

        let result = availability(&store);

        assert_eq!(result.available["p1"].quantity_available, "2");
    }

    #[rstest]
    fn empty_store_has_nothing_available() {
        assert_eq!(availability(&MemoryStore::default()), ProductAvailability::default());
    }

    #[rstest]
    #[case(MatchPolicy::KeyedField)]
    #[case(MatchPolicy::AnyValue)]
    fn finds_every_renter(store: MemoryStore, #[case] policy: MatchPolicy) {
        let result = lookup(&store, "p2", policy);

        let ids: Vec<_> = result.renters.keys().cloned().collect();
        assert_eq!(ids, vec!["u1", "u2"]);
        assert_eq!(result.renters["u1"].name, "Ann");
        assert_eq!(result.renters["u1"].email, "someone@example.com");
    }

    #[rstest]
    #[case(MatchPolicy::KeyedField)]
    #[case(MatchPolicy::AnyValue)]
    fn unknown_product_has_no_renters(store: MemoryStore, #[case] policy: MatchPolicy) {
        assert_eq!(lookup(&store, "p9", policy), RenterLookup::default());
    }

    #[rstest]
    fn renter_without_customer_record_is_skipped(store: MemoryStore) {
        store.seed(RecordKind::Rental, [rental("u8", "p4")]);
        assert!(lookup(&store, "p4", MatchPolicy::KeyedField).renters.is_empty());
    }

    #[rstest]
    fn keyed_policy_ignores_coincidental_values(store: MemoryStore) {
        store.seed(
            RecordKind::Rental,
            [Record::from_pairs([
                ("user_id", "u3"),
                ("product_id", "p1"),
                ("previous_product", "p7"),
            ])],
        );

        assert!(lookup(&store, "p7", MatchPolicy::KeyedField).renters.is_empty());
        let loose = lookup(&store, "p7", MatchPolicy::AnyValue);
        assert_eq!(loose.renters.keys().collect::<Vec<_>>(), vec!["u3"]);
    }

    #[rstest]
    fn incomplete_customer_is_rejected(store: MemoryStore) {
        store.seed(RecordKind::Rental, [rental("u4", "p5")]);
        store.seed(
            RecordKind::Customer,
            [Record::from_pairs([("user_id", "u4"), ("name", "Di")])],
        );

        let result = lookup(&store, "p5", MatchPolicy::KeyedField);

        assert!(result.renters.is_empty());
        assert_eq!(
            result.rejected,
            vec![RecordDefect::MissingField {
                kind: RecordKind::Customer,
                field: "address",
            }]
        );
    }

    #[rstest]
    fn rental_without_user_is_rejected(store: MemoryStore) {
        store.seed(RecordKind::Rental, [Record::from_pairs([("product_id", "p6")])]);

        let result = lookup(&store, "p6", MatchPolicy::KeyedField);

        assert!(result.renters.is_empty());
        assert_eq!(
            result.rejected,
            vec![RecordDefect::MissingField {
                kind: RecordKind::Rental,
                field: "user_id",
            }]
        );
    }
}
