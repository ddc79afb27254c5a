//! Connections: ordered snapshot histories with atomic commit.

use crate::error::{CoreError, CoreResult};
use crate::snapshot::Snapshot;
use crate::transact::Op;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// A connection's history: a non-empty sequence of snapshots, oldest first.
/// The last element is the present.
pub type History = Arc<Vec<Arc<Snapshot>>>;

/// Owns the ordered history of snapshots for one named database.
///
/// Readers load the history pointer once and are snapshot-consistent from
/// then on; nothing reachable from a snapshot ever changes. Writers go
/// through [`Connection::transact`], which commits with a compare-and-set
/// discipline: the new history is computed off to the side and swapped in
/// only if the history pointer is still the one that was read. A lost race
/// retries against the new present, so commits within a connection are
/// totally ordered.
pub struct Connection {
    name: String,
    history: RwLock<History>,
    closed: AtomicBool,
}

impl Connection {
    /// Creates a connection whose history is a single empty snapshot at
    /// time 0.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: RwLock::new(Arc::new(vec![Arc::new(Snapshot::empty())])),
            closed: AtomicBool::new(false),
        }
    }

    /// The connection's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Loads the full history with one atomic read.
    #[must_use]
    pub fn history(&self) -> History {
        Arc::clone(&self.history.read())
    }

    /// The present snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let history = self.history.read();
        Arc::clone(history.last().expect("connection history is never empty"))
    }

    /// The snapshot at a historical time, if it exists. Time `t` is the
    /// snapshot's 0-based position in the history.
    #[must_use]
    pub fn at(&self, time: u64) -> Option<Arc<Snapshot>> {
        usize::try_from(time)
            .ok()
            .and_then(|i| self.history.read().get(i).cloned())
    }

    /// Number of snapshots in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    /// Always false; a history holds at least the empty snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the connection has been dropped from the registry.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn poison(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Applies a sequence of operations atomically against the present and
    /// appends exactly one snapshot to the history.
    ///
    /// The whole sequence is one logical step: the new snapshot's time is
    /// one past the present's. If any operation fails, nothing is appended
    /// and the error surfaces. When another writer commits first, the
    /// transact is reapplied against the new present.
    pub fn transact(&self, ops: &[Op]) -> CoreResult<Arc<Snapshot>> {
        if self.is_closed() {
            return Err(CoreError::ConnectionClosed);
        }
        loop {
            let seen = self.history();
            let present = seen.last().expect("connection history is never empty");
            let next = Arc::new(present.apply(ops)?);

            let mut guard = self.history.write();
            if Arc::ptr_eq(&guard, &seen) {
                let mut appended = Vec::with_capacity(seen.len() + 1);
                appended.extend(seen.iter().cloned());
                appended.push(Arc::clone(&next));
                *guard = Arc::new(appended);
                debug!(
                    name = %self.name,
                    time = next.time(),
                    ops = ops.len(),
                    "committed"
                );
                return Ok(next);
            }
            drop(guard);
            trace!(name = %self.name, "commit raced, retrying against new present");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
