//! Per-key cancel-and-reschedule timers

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

type PendingTable<K> = Arc<Mutex<HashMap<K, Pending>>>;

/// Runs an action once a key has been quiet for `delay`.
///
/// Scheduling a key that already has a pending action cancels it, so a
/// burst of events produces a single run after the last one. Actions that
/// have started are never cancelled. Dropping the debouncer cancels
/// everything still pending.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<K> {
    delay: Duration,
    pending: PendingTable<K>,
    generation: AtomicU64,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` for `key`, replacing any pending one.
    pub fn schedule<F, Fut>(&self, key: K, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let table = Arc::clone(&self.pending);
        let delay = self.delay;
        let task_key = key.clone();

        // Held across the spawn so the task cannot look itself up before
        // it has been registered.
        let mut pending = lock(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = lock(&table);
                match pending.get(&task_key) {
                    Some(entry) if entry.generation == generation => {
                        pending.remove(&task_key);
                    }
                    _ => return,
                }
            }
            action().await;
        });

        if let Some(previous) = pending.insert(key, Pending { generation, handle }) {
            previous.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.pending).contains_key(key)
    }

    /// Number of keys with an action waiting to fire.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Cancel the pending action of `key`; true if there was one.
    pub fn cancel(&self, key: &K) -> bool {
        match lock(&self.pending).remove(key) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending action without running it.
    pub fn cancel_all(&self) {
        for (_, entry) in lock(&self.pending).drain() {
            entry.handle.abort();
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, entry) in lock(&self.pending).drain() {
            entry.handle.abort();
        }
    }
}

fn lock<K>(table: &Mutex<HashMap<K, Pending>>) -> MutexGuard<'_, HashMap<K, Pending>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
