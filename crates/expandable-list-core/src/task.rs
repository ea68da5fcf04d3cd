//! Owner-thread task queue.
//!
//! Tasks can be posted from any thread and are executed when the owning
//! thread drains the queue. This is how results computed on a background
//! worker hop back to the UI thread before touching a list view.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;

/// Ticket for a posted task, usable with [`TaskQueue::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// The ticket number. Numbers are unique per process.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    fn issue() -> Self {
        static ISSUED: AtomicU64 = AtomicU64::new(1);
        Self(ISSUED.fetch_add(1, Ordering::Relaxed))
    }
}

type Thunk = Box<dyn FnOnce() + Send + 'static>;

struct Posted {
    id: TaskId,
    run: Thunk,
}

/// A shared FIFO of tasks waiting to run on the owning thread.
///
/// `TaskQueue` is a cheap handle: clones share the same queue, so one clone
/// can be handed to a worker thread for posting while the owner keeps another
/// for draining.
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Arc<Mutex<VecDeque<Posted>>>,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl TaskQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` for the owner's next [`process_all`](Self::process_all).
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = TaskId::issue();
        self.tasks.lock().push_back(Posted {
            id,
            run: Box::new(task),
        });
        tracing::trace!(target: targets::TASK, task_id = id.as_u64(), "task posted");
        id
    }

    /// Drops a task that has not run yet. `false` if it already ran or was cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.lock();
        match tasks.iter().position(|posted| posted.id == id) {
            Some(index) => tasks.remove(index).is_some(),
            None => false,
        }
    }

    /// `true` while anything is waiting.
    pub fn has_pending(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    /// Number of waiting tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Runs the tasks that were waiting when the call began, oldest first.
    ///
    /// The lock is not held while a task runs. Tasks posted during the drain
    /// wait for the next one.
    ///
    /// Returns how many tasks ran.
    pub fn process_all(&self) -> usize {
        let batch = self.pending_count();
        let mut ran = 0;
        while ran < batch {
            let Some(posted) = self.tasks.lock().pop_front() else {
                break;
            };
            (posted.run)();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(target: targets::TASK, ran, "task queue drained");
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_process() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            queue.post(move || log.lock().push(i));
        }

        assert_eq!(queue.pending_count(), 3);
        assert_eq!(queue.process_all(), 3);
        assert!(!queue.has_pending());
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel() {
        let queue = TaskQueue::new();
        let ran = Arc::new(Mutex::new(false));

        let ran_clone = ran.clone();
        let id = queue.post(move || *ran_clone.lock() = true);

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.process_all(), 0);
        assert!(!*ran.lock());
    }

    #[test]
    fn test_follow_up_task_waits_for_next_drain() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_queue = queue.clone();
        let log_clone = log.clone();
        queue.post(move || {
            log_clone.lock().push("first");
            let log_inner = log_clone.clone();
            inner_queue.post(move || log_inner.lock().push("second"));
        });

        assert_eq!(queue.process_all(), 1);
        assert_eq!(*log.lock(), vec!["first"]);
        assert_eq!(queue.process_all(), 1);
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_post_from_other_thread() {
        let queue = TaskQueue::new();
        let ran = Arc::new(Mutex::new(false));

        let poster = queue.clone();
        let ran_clone = ran.clone();
        std::thread::spawn(move || {
            poster.post(move || *ran_clone.lock() = true);
        })
        .join()
        .unwrap();

        assert_eq!(queue.process_all(), 1);
        assert!(*ran.lock());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let queue = TaskQueue::new();
        let a = queue.post(|| {});
        let b = queue.post(|| {});
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
