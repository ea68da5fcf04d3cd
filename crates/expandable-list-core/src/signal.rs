//! Change notifications.
//!
//! An adapter reports row changes by emitting a [`Signal`]. Hosts and other
//! observers subscribe by connecting a closure and get back a
//! [`ConnectionId`] to unsubscribe with.
//!
//! Emission takes a snapshot of the connected slots and releases the table
//! lock before calling them. A slot may therefore connect, disconnect or emit
//! on the same signal. A slot removed mid-emission still sees the emission in
//! progress.
//!
//! ```
//! use expandable_list_core::Signal;
//!
//! let range_changed = Signal::<(usize, usize)>::new();
//! let id = range_changed.connect(|&(start, count)| {
//!     println!("rebind rows {}..{}", start, start + count);
//! });
//!
//! range_changed.emit((0, 5));
//! assert!(range_changed.disconnect(id));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle to one connected slot.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with any number of subscribers.
///
/// Slots run on the emitting thread, in the order the slot table yields
/// them. The adapter emits only from its owner thread.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    muted: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .field("muted", &self.muted.load(Ordering::Relaxed))
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Creates a signal nobody listens to yet.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            muted: AtomicBool::new(false),
        }
    }

    /// Subscribes `slot`.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Unsubscribes one slot. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Returns `true` while `id` is still subscribed.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.slots.lock().contains_key(id)
    }

    /// Unsubscribes every slot.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Number of subscribed slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Suppresses (or resumes) emission without dropping subscriptions.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Release);
    }

    /// Returns `true` while emission is suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Acquire)
    }

    /// Calls every subscribed slot with `args`, unless muted.
    pub fn emit(&self, args: Args) {
        if self.is_muted() {
            tracing::trace!(target: targets::SIGNAL, "muted, emission dropped");
            return;
        }

        let snapshot: Vec<Slot<Args>> = self.slots.lock().values().map(Arc::clone).collect();
        tracing::trace!(target: targets::SIGNAL, slots = snapshot.len(), "emit");

        for slot in &snapshot {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);
