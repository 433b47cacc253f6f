//! Core domain types for the rental inventory.
//!
//! Records are loosely typed: every stored document is a flat mapping of
//! field names to raw string values, exactly as read from its source file.
//! The fixed shapes returned by queries ([`ProductSummary`] and
//! [`ContactRecord`]) are built from those mappings and report missing or
//! malformed fields as a [`RecordDefect`] rather than failing the whole scan.
#![forbid(unsafe_code)]

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod record;
pub mod store;
pub mod timing;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use record::Record;
pub use store::{DocumentStore, StoreConnector};
#[cfg(feature = "store-sqlite")]
pub use store::{
    SqliteDocumentStore, SqliteStoreError, StoreConfig, StoreConfigError, StoreConnection,
};
pub use timing::{Timed, timed};

/// One of the three record sets held by the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Items that can be rented out.
    Product,
    /// People who rent products.
    Customer,
    /// Links between a customer and a product they rent.
    Rental,
}

impl RecordKind {
    /// Every kind, in the order counts are reported.
    pub const ALL: [Self; 3] = [Self::Product, Self::Customer, Self::Rental];

    /// Name of the collection holding records of this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Customer => "customers",
            Self::Rental => "rentals",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Product => "product",
            Self::Customer => "customer",
            Self::Rental => "rental",
        };
        f.write_str(label)
    }
}

/// Per-kind counters, reported as `(products, customers, rentals)`.
///
/// # Examples
///
/// ```
/// use rental_core::{KindCounts, RecordKind};
///
/// let mut counts = KindCounts::default();
/// counts[RecordKind::Customer] += 2;
/// assert_eq!(counts.as_tuple(), (0, 2, 0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    /// Count for the product collection.
    pub products: usize,
    /// Count for the customer collection.
    pub customers: usize,
    /// Count for the rental collection.
    pub rentals: usize,
}

impl KindCounts {
    /// Build counts from a `(products, customers, rentals)` tuple.
    #[must_use]
    pub const fn new(products: usize, customers: usize, rentals: usize) -> Self {
        Self {
            products,
            customers,
            rentals,
        }
    }

    /// Counts ordered as `(products, customers, rentals)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (usize, usize, usize) {
        (self.products, self.customers, self.rentals)
    }

    /// Sum across all kinds.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.products + self.customers + self.rentals
    }
}

impl Index<RecordKind> for KindCounts {
    type Output = usize;

    fn index(&self, kind: RecordKind) -> &Self::Output {
        match kind {
            RecordKind::Product => &self.products,
            RecordKind::Customer => &self.customers,
            RecordKind::Rental => &self.rentals,
        }
    }
}

impl IndexMut<RecordKind> for KindCounts {
    fn index_mut(&mut self, kind: RecordKind) -> &mut Self::Output {
        match kind {
            RecordKind::Product => &mut self.products,
            RecordKind::Customer => &mut self.customers,
            RecordKind::Rental => &mut self.rentals,
        }
    }
}

/// Product fields reported by the availability query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Free-text description.
    pub description: String,
    /// Product category.
    pub product_type: String,
    /// Quantity on hand, kept as the raw stored string.
    pub quantity_available: String,
}

impl ProductSummary {
    /// Project a product record onto the summary shape.
    pub fn from_record(record: &Record) -> Result<Self, RecordDefect> {
        Ok(Self {
            description: required(record, RecordKind::Product, "description")?,
            product_type: required(record, RecordKind::Product, "product_type")?,
            quantity_available: required(record, RecordKind::Product, "quantity_available")?,
        })
    }

    /// Whether the quantity is a non-zero integer.
    ///
    /// The quantity may carry surrounding whitespace and a leading sign and
    /// has no magnitude limit. Anything else is reported as
    /// [`RecordDefect::MalformedQuantity`].
    pub fn is_available(&self, product_id: &str) -> Result<bool, RecordDefect> {
        let trimmed = self.quantity_available.trim();
        let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(RecordDefect::MalformedQuantity {
                product_id: product_id.to_owned(),
                value: self.quantity_available.clone(),
            });
        }
        Ok(digits.bytes().any(|byte| byte != b'0'))
    }
}

/// Customer contact details reported by the rental lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Customer name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Phone number as stored.
    pub phone_number: String,
    /// Email address.
    pub email: String,
}

impl ContactRecord {
    /// Project a customer record onto the contact shape.
    pub fn from_record(record: &Record) -> Result<Self, RecordDefect> {
        Ok(Self {
            name: required(record, RecordKind::Customer, "name")?,
            address: required(record, RecordKind::Customer, "address")?,
            phone_number: required(record, RecordKind::Customer, "phone_number")?,
            email: required(record, RecordKind::Customer, "email")?,
        })
    }
}

/// Data-quality problem that excludes a single stored record from a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    /// A field the query needs is absent from the record.
    #[error("{kind} record has no `{field}` field")]
    MissingField {
        /// Kind of the offending record.
        kind: RecordKind,
        /// Name of the absent field.
        field: &'static str,
    },
    /// The quantity could not be read as an integer.
    #[error("product {product_id} has non-numeric quantity {value:?}")]
    MalformedQuantity {
        /// Identifier of the offending product.
        product_id: String,
        /// Raw stored quantity.
        value: String,
    },
}

/// Fetch a field that must be present, cloning its value.
pub fn required(
    record: &Record,
    kind: RecordKind,
    field: &'static str,
) -> Result<String, RecordDefect> {
    record
        .get(field)
        .map(str::to_owned)
        .ok_or(RecordDefect::MissingField { kind, field })
}
