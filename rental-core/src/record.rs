//! Loosely typed records as stored in a collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single document: field names mapped to raw string values.
///
/// The field set is whatever the source file's header row named; nothing is
/// added, removed, or defaulted. Values are never coerced, so a numeric
/// column such as `quantity_available` stays a string.
///
/// # Examples
///
/// ```
/// use rental_core::Record;
///
/// let rental = Record::from_pairs([("user_id", "u1"), ("product_id", "p2")]);
/// assert_eq!(rental.get("product_id"), Some("p2"));
/// assert!(rental.contains_value("u1"));
/// assert!(!rental.contains_value("product_id"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Build a record from `(field, value)` pairs. A repeated field keeps the
    /// last value.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }

    /// Value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether any field of the record holds exactly `value`.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.fields.values().any(|candidate| candidate == value)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
