//! Document store access for the three record collections.
//!
//! [`DocumentStore`] is what importers and queries talk to: a handle on an
//! open connection. [`StoreConnector`] hands out those handles and bounds
//! their lifetime; [`StoreConnector::with_connection`] is the only way the
//! inventory service touches a store, so every operation acquires its own
//! connection and releases it on every exit path.

use std::error::Error;

use crate::{Record, RecordKind};

#[cfg(feature = "store-sqlite")]
mod config;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use config::{DEFAULT_DATABASE, StoreConfig, StoreConfigError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteDocumentStore, SqliteStoreError, StoreConnection};

/// Collections of loosely typed documents, one per [`RecordKind`].
///
/// No uniqueness is enforced on any field: inserting the same record twice
/// stores it twice. Collections are independent of each other.
pub trait DocumentStore {
    /// Failure raised by the backing store.
    type Error: Error + Send + Sync + 'static;

    /// Append `records` to the collection for `kind`, returning how many were
    /// written.
    fn insert_many(&mut self, kind: RecordKind, records: &[Record]) -> Result<usize, Self::Error>;

    /// Every record of `kind`, in insertion order. A collection that was
    /// never written (or was dropped) reads as empty.
    fn find_all(&self, kind: RecordKind) -> Result<Vec<Record>, Self::Error>;

    /// Number of records of `kind`.
    fn count(&self, kind: RecordKind) -> Result<usize, Self::Error>;

    /// Remove the collection for `kind` and all of its records. Dropping a
    /// missing collection succeeds.
    fn drop_collection(&mut self, kind: RecordKind) -> Result<(), Self::Error>;
}

/// Source of scoped store connections.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use rental_core::{
///     DocumentStore, Record, RecordKind, SqliteDocumentStore, StoreConfig, StoreConnector,
/// };
///
/// let dir = tempfile::tempdir().expect("create temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("media.db")).expect("utf-8 path");
/// let store = SqliteDocumentStore::new(StoreConfig::new(path));
/// let written = store
///     .with_connection(|connection| {
///         connection.insert_many(RecordKind::Product, &[Record::from_pairs([("product_id", "p1")])])
///     })
///     .expect("insert");
/// assert_eq!(written, 1);
/// ```
pub trait StoreConnector {
    /// Open connection handle.
    type Connection: DocumentStore<Error = Self::Error>;
    /// Failure raised while connecting, operating, or releasing.
    type Error: Error + Send + Sync + 'static;

    /// Acquire a new connection. Failures are returned immediately; there is
    /// no retry.
    fn connect(&self) -> Result<Self::Connection, Self::Error>;

    /// Close a connection acquired from [`Self::connect`].
    fn release(&self, connection: Self::Connection) -> Result<(), Self::Error> {
        drop(connection);
        Ok(())
    }

    /// Run `operation` with a fresh connection and release it afterwards,
    /// whether or not the operation succeeded.
    ///
    /// When both the operation and the release fail, the operation's error
    /// is returned and the release failure is logged.
    fn with_connection<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Connection) -> Result<T, E>,
        E: From<Self::Error>,
    {
        let mut connection = self.connect()?;
        let outcome = operation(&mut connection);
        match (outcome, self.release(connection)) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => Err(E::from(release_err)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(release_err)) => {
                log::warn!("failed to release store connection after an error: {release_err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, MemoryStoreError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::default()
    }

    fn product(id: &str) -> Record {
        Record::from_pairs([("product_id", id)])
    }

    #[rstest]
    fn releases_after_success(store: MemoryStore) {
        let count = store
            .with_connection(|connection| {
                connection.insert_many(RecordKind::Product, &[product("p1")])?;
                connection.count(RecordKind::Product)
            })
            .expect("insert and count");
        assert_eq!(count, 1);
        assert_eq!(store.connections_opened(), 1);
        assert_eq!(store.open_connections(), 0);
    }

    #[rstest]
    fn releases_after_operation_error(store: MemoryStore) {
        let outcome: Result<(), MemoryStoreError> =
            store.with_connection(|_| Err(MemoryStoreError::Rejected("boom")));
        assert!(matches!(outcome, Err(MemoryStoreError::Rejected("boom"))));
        assert_eq!(store.open_connections(), 0);
    }

    #[rstest]
    fn connect_failure_runs_nothing(store: MemoryStore) {
        store.set_unreachable(true);
        let mut ran = false;
        let outcome = store.with_connection(|_| {
            ran = true;
            Ok::<_, MemoryStoreError>(())
        });
        assert!(matches!(outcome, Err(MemoryStoreError::Unreachable)));
        assert!(!ran, "operation must not run without a connection");
        assert_eq!(store.connections_opened(), 0);
    }

    #[rstest]
    fn connections_are_not_shared(store: MemoryStore) {
        store
            .with_connection(|_| Ok::<_, MemoryStoreError>(()))
            .expect("first");
        store
            .with_connection(|_| Ok::<_, MemoryStoreError>(()))
            .expect("second");
        assert_eq!(store.connections_opened(), 2);
    }

    #[rstest]
    fn release_failure_after_success_is_returned(store: MemoryStore) {
        store.fail_release(true);
        let outcome = store.with_connection(|connection| {
            connection.insert_many(RecordKind::Product, &[product("p1")])
        });
        assert_eq!(outcome, Err(MemoryStoreError::Rejected("release")));
        assert_eq!(store.records(RecordKind::Product).len(), 1);
        assert_eq!(store.open_connections(), 0);
    }

    #[rstest]
    fn operation_error_wins_over_release_failure(store: MemoryStore) {
        store.fail_release(true);
        let outcome: Result<(), MemoryStoreError> =
            store.with_connection(|_| Err(MemoryStoreError::Rejected("boom")));
        assert_eq!(outcome, Err(MemoryStoreError::Rejected("boom")));
        assert_eq!(store.open_connections(), 0);
    }
}
