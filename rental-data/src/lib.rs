//! Reading, importing, and querying rental inventory records.
//!
//! Record files are CSV with a header row. [`import_records`] loads the
//! product, customer, and rental files into a [`rental_core::DocumentStore`];
//! [`available_products`] and [`renters_of`] answer the two inventory
//! questions over what was stored. [`RentalInventory`] bundles these behind
//! scoped, timed store connections.
#![forbid(unsafe_code)]

mod import;
mod inventory;
mod maintenance;
mod query;
mod records;

pub use import::{ImportReport, ImportRequest, KindFailure, import_records};
pub use inventory::RentalInventory;
pub use maintenance::{reset, stored_counts};
pub use query::{MatchPolicy, ProductAvailability, RenterLookup, available_products, renters_of};
pub use records::{RecordReadError, read_records};
