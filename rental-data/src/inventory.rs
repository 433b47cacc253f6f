//! The inventory service: each operation on its own store connection.

use rental_core::{KindCounts, StoreConnector, timed};

use crate::import::{ImportReport, ImportRequest, import_records};
use crate::maintenance::{reset, stored_counts};
use crate::query::{MatchPolicy, ProductAvailability, RenterLookup, available_products, renters_of};

/// Rental inventory backed by a document store.
///
/// Every method opens a connection through
/// [`StoreConnector::with_connection`], runs one operation, and releases the
/// connection before returning, successful or not. No connection outlives a
/// call, so nothing is shared between operations. Each call is timed on the
/// [`rental_core::timing::TIMING_TARGET`] log target.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use rental_core::{SqliteDocumentStore, StoreConfig};
/// use rental_data::{ImportRequest, RentalInventory};
///
/// let dir = tempfile::tempdir().expect("create temp dir");
/// let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
/// std::fs::write(
///     root.join("products.csv"),
///     "product_id,description,product_type,quantity_available\np1,Lamp,bedroom,2\n",
/// )
/// .expect("write products");
///
/// let inventory = RentalInventory::new(SqliteDocumentStore::new(StoreConfig::new(
///     root.join("media.db"),
/// )));
/// let report = inventory
///     .import(&ImportRequest::new(&root, "products.csv", "customers.csv", "rentals.csv"))
///     .expect("import");
/// assert_eq!(report.as_tuples(), ((1, 0, 0), (0, 1, 1)));
///
/// let availability = inventory.available_products().expect("query");
/// assert!(availability.available.contains_key("p1"));
/// ```
#[derive(Debug, Clone)]
pub struct RentalInventory<C> {
    connector: C,
    policy: MatchPolicy,
}

impl<C: StoreConnector> RentalInventory<C> {
    /// Inventory using keyed-field matching for rental lookups.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self::with_policy(connector, MatchPolicy::default())
    }

    /// Inventory using `policy` for rental lookups.
    #[must_use]
    pub const fn with_policy(connector: C, policy: MatchPolicy) -> Self {
        Self { connector, policy }
    }

    /// Match policy used by [`Self::renters_of`].
    #[must_use]
    pub const fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Import the three record files named by `request`.
    ///
    /// Missing or unreadable files are reported per kind in the returned
    /// [`ImportReport`]; only store failures abort the import.
    pub fn import(&self, request: &ImportRequest) -> Result<ImportReport, C::Error> {
        timed("import_data", || {
            self.connector
                .with_connection(|connection| import_records(connection, request))
        })
        .into_inner()
    }

    /// Products with a non-zero quantity available.
    pub fn available_products(&self) -> Result<ProductAvailability, C::Error> {
        timed("show_available_products", || {
            self.connector
                .with_connection(|connection| available_products(&*connection))
        })
        .into_inner()
    }

    /// Customers renting `product_id`.
    pub fn renters_of(&self, product_id: &str) -> Result<RenterLookup, C::Error> {
        let policy = self.policy;
        timed("show_rentals", || {
            self.connector
                .with_connection(|connection| renters_of(&*connection, product_id, policy))
        })
        .into_inner()
    }

    /// Drop every collection.
    pub fn reset(&self) -> Result<(), C::Error> {
        timed("clear_data", || {
            self.connector.with_connection(|connection| reset(connection))
        })
        .into_inner()
    }

    /// Number of records held in each collection.
    pub fn stored_counts(&self) -> Result<KindCounts, C::Error> {
        timed("stored_counts", || {
            self.connector
                .with_connection(|connection| stored_counts(&*connection))
        })
        .into_inner()
    }
}
