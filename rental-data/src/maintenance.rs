//! Whole-collection maintenance.

use rental_core::{DocumentStore, KindCounts, RecordKind};

/// Drop the product, customer, and rental collections.
///
/// Leaves the store empty and ready for a fresh import.
pub fn reset<S>(store: &mut S) -> Result<(), S::Error>
where
    S: DocumentStore + ?Sized,
{
    for kind in RecordKind::ALL {
        store.drop_collection(kind)?;
    }
    Ok(())
}

/// Number of records held in each collection.
pub fn stored_counts<S>(store: &S) -> Result<KindCounts, S::Error>
where
    S: DocumentStore + ?Sized,
{
    let mut counts = KindCounts::default();
    for kind in RecordKind::ALL {
        counts[kind] = store.count(kind)?;
    }
    Ok(counts)
}
