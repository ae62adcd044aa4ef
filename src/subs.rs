//! In-process subscriptions to store refreshes.
//!
//! Scope:
//! - The store publishes a RefreshEvent after each full rebuild of its snapshot.
//! - Consumers (editor panel, completion registration) re-render or re-register.
//! - Drop of SubscriptionHandle unsubscribes.
//!
//! Callbacks run synchronously on the thread that triggered the refresh, outside
//! the registry lock. Keep them fast.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, Weak};

use crate::snippet::Snapshot;

/// Emitted after every refresh.
/// - generation: monotonic refresh counter of the store
/// - languages: language ids with a persisted partition
/// - snapshot: the new snapshot (shared, read-only)
#[derive(Clone, Debug)]
pub struct RefreshEvent {
    pub generation: u64,
    pub languages: BTreeSet<String>,
    pub snapshot: Arc<Snapshot>,
}

pub type Callback = Arc<dyn Fn(&RefreshEvent) + Send + Sync + 'static>;

#[derive(Default)]
struct SubInner {
    next_id: u64,
    subs: HashMap<u64, Callback>,
}

/// Subscription registry (held inside SnippetStore).
pub struct SubRegistry {
    inner: Mutex<SubInner>,
}

impl SubRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SubInner::default()),
        })
    }

    /// Returns a handle; dropping it unsubscribes.
    pub fn subscribe(self: &Arc<Self>, cb: Callback) -> SubscriptionHandle {
        let mut g = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let id = g.next_id;
        g.next_id = g.next_id.wrapping_add(1);
        g.subs.insert(id, cb);
        drop(g);
        SubscriptionHandle {
            id,
            reg: Arc::downgrade(self),
        }
    }

    pub fn publish(&self, ev: &RefreshEvent) {
        let callbacks: Vec<Callback> = {
            let g = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            g.subs.values().cloned().collect()
        };
        // Execute outside the lock
        for cb in callbacks {
            cb(ev);
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .subs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn unsubscribe(&self, id: u64) {
        let mut g = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        g.subs.remove(&id);
    }
}

/// RAII handle: unsubscribes on drop.
pub struct SubscriptionHandle {
    id: u64,
    reg: Weak<SubRegistry>,
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(reg) = self.reg.upgrade() {
            reg.unsubscribe(self.id);
        }
    }
}

pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&RefreshEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
