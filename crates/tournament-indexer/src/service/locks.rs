//! Per-address serialization
//!
//! Events for one tournament address run one at a time; events for
//! different addresses only contend on the registry map for the instant
//! it takes to fetch their lock.

use parking_lot::Mutex;
use shared_types::Address;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of per-address locks. Idle entries are pruned on release.
#[derive(Default)]
pub struct AddressLocks {
    locks: Mutex<HashMap<Address, Arc<Mutex<()>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `address`.
    pub fn with_lock<R>(&self, address: &Address, f: impl FnOnce() -> R) -> R {
        let lock = Arc::clone(self.locks.lock().entry(*address).or_default());

        let result = {
            let _guard = lock.lock();
            f()
        };

        let mut locks = self.locks.lock();
        // Registry plus this caller: nobody else is waiting.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(address);
        }
        result
    }

    /// Number of addresses with a live lock.
    pub fn active(&self) -> usize {
        self.locks.lock().len()
    }
}
