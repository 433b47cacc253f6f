//! Test-only, in-memory `DocumentStore` used by unit and behaviour tests.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use thiserror::Error;

use crate::{DocumentStore, Record, RecordKind, StoreConnector};

/// Failures the in-memory store can be told to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// The store was marked unreachable with [`MemoryStore::set_unreachable`].
    #[error("store is unreachable")]
    Unreachable,
    /// An operation was refused.
    #[error("store rejected the operation: {0}")]
    Rejected(&'static str),
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<RecordKind, Vec<Record>>,
    opened: usize,
    live: usize,
    unreachable: bool,
    fail_release: bool,
    rejected_kinds: Vec<RecordKind>,
}

/// In-memory store whose connections share one set of collections.
///
/// The store counts how many connections were opened and how many are still
/// alive, which lets tests check that every operation releases its handle.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    /// Make subsequent [`StoreConnector::connect`] calls fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.borrow_mut().unreachable = unreachable;
    }

    /// Make [`StoreConnector::release`] report a failure. The connection is
    /// still closed.
    pub fn fail_release(&self, fail: bool) {
        self.state.borrow_mut().fail_release = fail;
    }

    /// Make inserts into `kind` fail.
    pub fn reject_inserts(&self, kind: RecordKind) {
        self.state.borrow_mut().rejected_kinds.push(kind);
    }

    /// Total connections handed out so far.
    #[must_use]
    pub fn connections_opened(&self) -> usize {
        self.state.borrow().opened
    }

    /// Connections that have not been released yet.
    #[must_use]
    pub fn open_connections(&self) -> usize {
        self.state.borrow().live
    }

    /// Records currently held for `kind`.
    #[must_use]
    pub fn records(&self, kind: RecordKind) -> Vec<Record> {
        self.state
            .borrow()
            .collections
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed `kind` with records without going through a connection.
    pub fn seed<I>(&self, kind: RecordKind, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        self.state
            .borrow_mut()
            .collections
            .entry(kind)
            .or_default()
            .extend(records);
    }
}

impl StoreConnector for MemoryStore {
    type Connection = MemoryConnection;
    type Error = MemoryStoreError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.unreachable {
            return Err(MemoryStoreError::Unreachable);
        }
        state.opened += 1;
        state.live += 1;
        Ok(MemoryConnection {
            state: Rc::clone(&self.state),
        })
    }

    fn release(&self, connection: Self::Connection) -> Result<(), Self::Error> {
        drop(connection);
        if self.state.borrow().fail_release {
            return Err(MemoryStoreError::Rejected("release"));
        }
        Ok(())
    }
}

/// Connection handle for [`MemoryStore`]; releasing it is dropping it.
#[derive(Debug)]
pub struct MemoryConnection {
    state: Rc<RefCell<MemoryState>>,
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.live = state.live.saturating_sub(1);
    }
}

impl DocumentStore for MemoryConnection {
    type Error = MemoryStoreError;

    fn insert_many(&mut self, kind: RecordKind, records: &[Record]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.rejected_kinds.contains(&kind) {
            return Err(MemoryStoreError::Rejected("insert"));
        }
        state
            .collections
            .entry(kind)
            .or_default()
            .extend_from_slice(records);
        Ok(records.len())
    }

    fn find_all(&self, kind: RecordKind) -> Result<Vec<Record>, Self::Error> {
        Ok(self
            .state
            .borrow()
            .collections
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    fn count(&self, kind: RecordKind) -> Result<usize, Self::Error> {
        Ok(self
            .state
            .borrow()
            .collections
            .get(&kind)
            .map_or(0, Vec::len))
    }

    fn drop_collection(&mut self, kind: RecordKind) -> Result<(), Self::Error> {
        self.state.borrow_mut().collections.remove(&kind);
        Ok(())
    }
}
