//! Owner-thread checks.
//!
//! A recycling list view may only be told about changes on the thread that
//! drives it. [`OwnerThread`] remembers that thread when an adapter is built
//! and verifies it on every call that can reach the view.
//!
//! [`OwnerThread::debug_ensure`] is active in debug builds by default;
//! [`set_owner_checks`] turns it on or off globally. [`OwnerThread::ensure`]
//! always checks.
//!
//! ```
//! use expandable_list_core::OwnerThread;
//!
//! let owner = OwnerThread::capture();
//! owner.ensure("rebind");
//!
//! let elsewhere = std::thread::spawn(move || owner.is_current()).join().unwrap();
//! assert!(!elsewhere);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

static OWNER_CHECKS: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enables or disables [`OwnerThread::debug_ensure`] for the whole process.
pub fn set_owner_checks(enabled: bool) {
    OWNER_CHECKS.store(enabled, Ordering::SeqCst);
}

/// Returns whether [`OwnerThread::debug_ensure`] currently checks anything.
pub fn owner_checks_enabled() -> bool {
    OWNER_CHECKS.load(Ordering::Relaxed)
}

/// The thread an adapter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerThread {
    id: ThreadId,
}

impl Default for OwnerThread {
    fn default() -> Self {
        Self::capture()
    }
}

impl OwnerThread {
    /// Records the calling thread as the owner.
    pub fn capture() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// The owner's thread id.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Returns `true` when called on the owner thread.
    #[inline]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Panics unless called on the owner thread.
    ///
    /// # Panics
    ///
    /// Panics naming `operation` and both threads when called elsewhere.
    pub fn ensure(&self, operation: &str) {
        if !self.is_current() {
            self.wrong_thread(operation);
        }
    }

    /// Like [`ensure`](Self::ensure), but only while owner checks are enabled.
    ///
    /// # Panics
    ///
    /// Panics when checks are enabled and called off the owner thread.
    #[inline]
    pub fn debug_ensure(&self, operation: &str) {
        if owner_checks_enabled() {
            self.ensure(operation);
        }
    }

    #[cold]
    #[inline(never)]
    fn wrong_thread(&self, operation: &str) -> ! {
        let caller = thread::current();
        panic!(
            "{operation} called on thread {:?} ({:?}), but the list is owned by thread {:?}; \
             post the call to the adapter's task queue instead",
            caller.name().unwrap_or("unnamed"),
            caller.id(),
            self.id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_matches_caller() {
        let owner = OwnerThread::capture();
        assert!(owner.is_current());
        assert_eq!(owner.id(), thread::current().id());
        assert_eq!(OwnerThread::default(), owner);
        owner.ensure("same thread");
        owner.debug_ensure("same thread");
    }

    #[test]
    fn test_other_thread_is_not_owner() {
        let owner = OwnerThread::capture();
        let on_owner = thread::spawn(move || owner.is_current()).join().unwrap();
        assert!(!on_owner);
    }

    #[test]
    fn test_ensure_panics_off_owner_thread() {
        let owner = OwnerThread::capture();
        let outcome = thread::Builder::new()
            .name("intruder".into())
            .spawn(move || owner.ensure("bind_parent_row"))
            .unwrap()
            .join();

        let payload = outcome.unwrap_err();
        let message = payload.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(message.contains("bind_parent_row"));
        assert!(message.contains("intruder"));
    }
}
