//! Facade crate for the rental inventory.
//!
//! This crate re-exports the domain types, the import and query operations,
//! and the SQLite document store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use rental_core::{
    ContactRecord, DocumentStore, KindCounts, ProductSummary, Record, RecordDefect, RecordKind,
    StoreConnector, Timed, timed,
};

#[cfg(feature = "store-sqlite")]
pub use rental_core::{
    SqliteDocumentStore, SqliteStoreError, StoreConfig, StoreConfigError, StoreConnection,
};

#[cfg(feature = "test-support")]
pub use rental_core::test_support;

pub use rental_data::{
    ImportReport, ImportRequest, KindFailure, MatchPolicy, ProductAvailability, RecordReadError,
    RentalInventory, RenterLookup, available_products, import_records, read_records, renters_of,
    reset, stored_counts,
};
