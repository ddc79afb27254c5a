//! Process-global registry of named connections.

use crate::connection::Connection;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Connection>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Arc<Connection>>> {
    REGISTRY.get_or_init(Default::default)
}

/// Returns the connection registered under `name`, creating an empty one
/// (a single time-0 snapshot) if none exists.
pub fn open(name: &str) -> Arc<Connection> {
    if let Some(conn) = registry().read().get(name) {
        return Arc::clone(conn);
    }
    let mut reg = registry().write();
    // Another opener may have won the race between the two locks.
    Arc::clone(reg.entry(name.to_string()).or_insert_with(|| {
        debug!(name, "creating connection");
        Arc::new(Connection::new(name))
    }))
}

/// Detaches `name` from the registry. Handles already held keep working;
/// a subsequent [`open`] of the same name starts a fresh history. Returns
/// false if the name was not registered.
pub fn close(name: &str) -> bool {
    let removed = registry().write().remove(name).is_some();
    if removed {
        debug!(name, "closed connection");
    }
    removed
}

/// Detaches `name` from the registry and poisons the connection: further
/// transacts through any handle fail with `ConnectionClosed`, while
/// snapshots already obtained remain readable. Returns false if the name
/// was not registered.
pub fn drop(name: &str) -> bool {
    match registry().write().remove(name) {
        Some(conn) => {
            conn.poison();
            debug!(name, "dropped connection");
            true
        }
        None => false,
    }
}
