//! SQLite-backed document store.
//!
//! Each collection is a table of JSON documents keyed by an autoincrementing
//! sequence number, which preserves insertion order. Tables are created on
//! first insert and removed by [`DocumentStore::drop_collection`].

use std::fmt;

use camino::Utf8PathBuf;
use rusqlite::{Connection, Error as SqliteError, OptionalExtension};
use thiserror::Error;

use crate::{DocumentStore, Record, RecordKind, StoreConnector};

use super::StoreConfig;

/// Errors raised by [`SqliteDocumentStore`] and its connections.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Failed to create the directory holding the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database location.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Closing the SQLite database failed.
    #[error("failed to close SQLite database at {path}")]
    Close {
        /// Database location.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A statement against a collection failed.
    #[error("failed to {operation} in collection {collection}")]
    Sqlite {
        /// What the store was doing.
        operation: &'static str,
        /// Collection the statement targeted.
        collection: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A record could not be encoded as JSON.
    #[error("failed to encode a record for collection {collection}")]
    Encode {
        /// Destination collection.
        collection: &'static str,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored document was not a flat JSON object of strings.
    #[error("document {seq} in collection {collection} is not a valid record")]
    Decode {
        /// Collection holding the document.
        collection: &'static str,
        /// Sequence number of the document.
        seq: i64,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// SQLite reported a negative row count.
    #[error("collection {collection} reported invalid count {count}")]
    InvalidCount {
        /// Collection being counted.
        collection: &'static str,
        /// Count returned by SQLite.
        count: i64,
    },
}

/// Document store kept in a single SQLite database file.
///
/// The store holds only configuration; every call to
/// [`StoreConnector::connect`] opens a fresh [`StoreConnection`].
#[derive(Debug, Clone, Default)]
pub struct SqliteDocumentStore {
    config: StoreConfig,
}

impl SqliteDocumentStore {
    /// Store located by `config`.
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl StoreConnector for SqliteDocumentStore {
    type Connection = StoreConnection;
    type Error = SqliteStoreError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        StoreConnection::open(&self.config)
    }

    fn release(&self, connection: Self::Connection) -> Result<(), Self::Error> {
        connection.close()
    }
}

/// An open connection to the SQLite document store.
///
/// Dropping the connection closes it; [`StoreConnection::close`] does the
/// same but reports failures.
pub struct StoreConnection {
    connection: Connection,
    path: Utf8PathBuf,
}

impl fmt::Debug for StoreConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl StoreConnection {
    /// Open the database named by `config`, creating it and its parent
    /// directories if needed.
    pub fn open(config: &StoreConfig) -> Result<Self, SqliteStoreError> {
        let path = config.path.clone();
        rental_fs::ensure_parent_dir(&path).map_err(|source| {
            SqliteStoreError::CreateDirectory {
                path: path.clone(),
                source,
            }
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.clone(),
                source,
            })?;
        log::debug!("opened store connection to {path}");
        Ok(Self { connection, path })
    }

    /// Close the connection.
    pub fn close(self) -> Result<(), SqliteStoreError> {
        let Self { connection, path } = self;
        connection
            .close()
            .map_err(|(_, source)| SqliteStoreError::Close {
                path: path.clone(),
                source,
            })?;
        log::debug!("closed store connection to {path}");
        Ok(())
    }

    fn collection_exists(&self, collection: &'static str) -> Result<bool, SqliteStoreError> {
        self.connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [collection],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
            .map_err(sqlite_error("look up collection", collection))
    }
}

fn sqlite_error(
    operation: &'static str,
    collection: &'static str,
) -> impl FnOnce(SqliteError) -> SqliteStoreError {
    move |source| SqliteStoreError::Sqlite {
        operation,
        collection,
        source,
    }
}

fn create_collection(
    connection: &Connection,
    collection: &'static str,
) -> Result<(), SqliteStoreError> {
    connection
        .execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {collection} (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    document TEXT NOT NULL
                )"
            ),
            [],
        )
        .map(|_| ())
        .map_err(sqlite_error("create collection", collection))
}

impl DocumentStore for StoreConnection {
    type Error = SqliteStoreError;

    fn insert_many(&mut self, kind: RecordKind, records: &[Record]) -> Result<usize, Self::Error> {
        let collection = kind.collection();
        let transaction = self
            .connection
            .transaction()
            .map_err(sqlite_error("begin insert transaction", collection))?;
        create_collection(&transaction, collection)?;
        {
            let mut statement = transaction
                .prepare_cached(&format!("INSERT INTO {collection} (document) VALUES (?1)"))
                .map_err(sqlite_error("prepare insert", collection))?;
            for record in records {
                let document = serde_json::to_string(record)
                    .map_err(|source| SqliteStoreError::Encode { collection, source })?;
                statement
                    .execute([document])
                    .map_err(sqlite_error("insert document", collection))?;
            }
        }
        transaction
            .commit()
            .map_err(sqlite_error("commit insert transaction", collection))?;
        Ok(records.len())
    }

    fn find_all(&self, kind: RecordKind) -> Result<Vec<Record>, Self::Error> {
        let collection = kind.collection();
        if !self.collection_exists(collection)? {
            return Ok(Vec::new());
        }
        let mut statement = self
            .connection
            .prepare(&format!(
                "SELECT seq, document FROM {collection} ORDER BY seq"
            ))
            .map_err(sqlite_error("prepare scan", collection))?;
        let mut rows = statement
            .query([])
            .map_err(sqlite_error("scan documents", collection))?;
        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(sqlite_error("read document", collection))?
        {
            let seq: i64 = row
                .get(0)
                .map_err(sqlite_error("read sequence number", collection))?;
            let document: String = row
                .get(1)
                .map_err(sqlite_error("read document body", collection))?;
            let record = serde_json::from_str(&document).map_err(|source| {
                SqliteStoreError::Decode {
                    collection,
                    seq,
                    source,
                }
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn count(&self, kind: RecordKind) -> Result<usize, Self::Error> {
        let collection = kind.collection();
        if !self.collection_exists(collection)? {
            return Ok(0);
        }
        let count: i64 = self
            .connection
            .query_row(&format!("SELECT COUNT(*) FROM {collection}"), [], |row| {
                row.get(0)
            })
            .map_err(sqlite_error("count documents", collection))?;
        usize::try_from(count).map_err(|_| SqliteStoreError::InvalidCount { collection, count })
    }

    fn drop_collection(&mut self, kind: RecordKind) -> Result<(), Self::Error> {
        let collection = kind.collection();
        self.connection
            .execute(&format!("DROP TABLE IF EXISTS {collection}"), [])
            .map(|_| ())
            .map_err(sqlite_error("drop collection", collection))
    }
}
