//! Background worker.
//!
//! A [`Worker`] is one named thread fed by a bounded channel. Jobs run one
//! at a time in submission order, so anything that is only ever mutated from
//! jobs on the same worker has a single writer.
//!
//! Results do not come back on the worker thread. A job submitted with
//! [`Worker::send_with_callback`] hands its result to a callback that is
//! posted to the owner's [`TaskQueue`] and runs on the owner's next drain.
//!
//! ```
//! use expandable_list_core::{TaskQueue, WorkerBuilder};
//!
//! let owner_queue = TaskQueue::new();
//! let worker = WorkerBuilder::new()
//!     .name("flags")
//!     .queue_capacity(16)
//!     .build::<usize>(owner_queue.clone())
//!     .expect("spawn worker");
//!
//! worker
//!     .send_with_callback(|| 3, |updated| println!("updated {} groups", updated))
//!     .expect("queue job");
//!
//! worker.send_sync(|| 0).expect("barrier");
//! assert_eq!(owner_queue.process_all(), 1);
//!
//! worker.stop_and_join();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::error::{Result, WorkerError};
use crate::logging::targets;
use crate::task::TaskQueue;

/// Worker settings.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Thread name, also used in errors and logs.
    pub name: String,
    /// Thread stack size in bytes; `None` keeps the platform default.
    pub stack_size: Option<usize>,
    /// Jobs that may wait in the channel before submissions fail.
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "expandable-list-worker".to_string(),
            stack_size: None,
            queue_capacity: 256,
        }
    }
}

impl WorkerConfig {
    /// Default settings under another thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fluent construction of a [`Worker`].
#[derive(Debug, Default)]
pub struct WorkerBuilder {
    config: WorkerConfig,
}

impl WorkerBuilder {
    /// Starts from [`WorkerConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Thread stack size in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Channel capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Spawns the worker; callbacks are posted to `owner_queue`.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Spawn`] if the OS refuses the thread.
    pub fn build<T: Send + 'static>(self, owner_queue: TaskQueue) -> Result<Worker<T>> {
        Worker::with_config(self.config, owner_queue)
    }
}

struct Shared {
    accepting: AtomicBool,
    in_flight: AtomicUsize,
}

type Job<T> = Box<dyn FnOnce() -> T + Send>;

enum Message<T> {
    Deliver {
        job: Job<T>,
        callback: Box<dyn FnOnce(T) + Send>,
    },
    Reply {
        job: Job<T>,
        reply: Sender<T>,
    },
    Stop,
}

/// A named background thread running jobs that produce `T`.
pub struct Worker<T: Send + 'static> {
    name: String,
    capacity: usize,
    jobs: Sender<Message<T>>,
    thread: Mutex<Option<JoinHandle<()>>>,
    shared: Arc<Shared>,
}

impl<T: Send + 'static> std::fmt::Debug for Worker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("accepting", &self.is_running())
            .field("in_flight", &self.pending_tasks())
            .finish()
    }
}

impl<T: Send + 'static> Worker<T> {
    /// Spawns a worker; callbacks are posted to `owner_queue`.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Spawn`] if the OS refuses the thread.
    pub fn with_config(config: WorkerConfig, owner_queue: TaskQueue) -> Result<Self> {
        let (jobs, inbox) = bounded(config.queue_capacity);
        let shared = Arc::new(Shared {
            accepting: AtomicBool::new(true),
            in_flight: AtomicUsize::new(0),
        });

        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let thread_shared = Arc::clone(&shared);
        let thread_name = config.name.clone();
        let handle = builder
            .spawn(move || {
                tracing::debug!(target: targets::WORKER, worker = %thread_name, "worker started");
                run(&inbox, &thread_shared, &owner_queue);
                thread_shared.accepting.store(false, Ordering::Release);
                tracing::debug!(target: targets::WORKER, worker = %thread_name, "worker exited");
            })
            .map_err(|source| WorkerError::Spawn {
                name: config.name.clone(),
                source,
            })?;

        Ok(Self {
            name: config.name,
            capacity: config.queue_capacity,
            jobs,
            thread: Mutex::new(Some(handle)),
            shared,
        })
    }

    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `false` once [`stop`](Self::stop) was called or the thread exited.
    pub fn is_running(&self) -> bool {
        self.shared.accepting.load(Ordering::Acquire)
    }

    /// Jobs submitted but not finished yet.
    pub fn pending_tasks(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Queues `job`; its result is passed to `callback` on the owner thread.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Stopped`] after [`stop`](Self::stop);
    /// [`WorkerError::QueueFull`] when the channel is at capacity.
    pub fn send_with_callback<F, C>(&self, job: F, callback: C) -> Result<()>
    where
        F: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.submit(Message::Deliver {
            job: Box::new(job),
            callback: Box::new(callback),
        })
    }

    /// Queues `job` and blocks until it has run, returning its result.
    ///
    /// Every job queued earlier has finished by the time this returns, and
    /// the callbacks of those jobs are already posted to the owner queue.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Stopped`] if the worker stopped before answering;
    /// [`WorkerError::QueueFull`] when the channel is at capacity.
    pub fn send_sync<F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (reply, answer) = bounded(1);
        self.submit(Message::Reply {
            job: Box::new(job),
            reply,
        })?;
        answer.recv().map_err(|_| self.stopped())
    }

    /// Stops accepting jobs. Already queued jobs still run. Does not block.
    pub fn stop(&self) {
        if self.shared.accepting.swap(false, Ordering::AcqRel) {
            let _ = self.jobs.try_send(Message::Stop);
        }
    }

    /// Waits for the thread to exit.
    ///
    /// `false` if it was already joined or panicked.
    pub fn join(&self) -> bool {
        self.thread
            .lock()
            .take()
            .is_some_and(|handle| handle.join().is_ok())
    }

    /// [`stop`](Self::stop) followed by [`join`](Self::join).
    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }

    fn submit(&self, message: Message<T>) -> Result<()> {
        if !self.is_running() {
            return Err(self.stopped());
        }

        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
        let rejected = match self.jobs.try_send(message) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Full(_)) => WorkerError::QueueFull {
                name: self.name.clone(),
                capacity: self.capacity,
            },
            Err(TrySendError::Disconnected(_)) => self.stopped(),
        };
        self.shared.in_flight.fetch_sub(1, Ordering::AcqRel);

        tracing::warn!(target: targets::WORKER, worker = %self.name, error = %rejected, "job rejected");
        Err(rejected)
    }

    fn stopped(&self) -> WorkerError {
        WorkerError::Stopped {
            name: self.name.clone(),
        }
    }
}

impl<T: Send + 'static> Drop for Worker<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<T: Send + 'static>(inbox: &Receiver<Message<T>>, shared: &Shared, owner_queue: &TaskQueue) {
    while let Ok(message) = inbox.recv() {
        match message {
            Message::Deliver { job, callback } => {
                let value = job();
                owner_queue.post(move || callback(value));
            }
            Message::Reply { job, reply } => {
                let _ = reply.send(job());
            }
            Message::Stop => break,
        }
        shared.in_flight.fetch_sub(1, Ordering::AcqRel);

        // A stop request may not fit a full channel; exit once it is drained.
        if !shared.accepting.load(Ordering::Acquire) && inbox.is_empty() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spawn(queue: &TaskQueue) -> Worker<usize> {
        Worker::with_config(WorkerConfig::with_name("unit-worker"), queue.clone()).unwrap()
    }

    #[test]
    fn test_fresh_worker() {
        let queue = TaskQueue::new();
        let worker = spawn(&queue);

        assert!(worker.is_running());
        assert_eq!(worker.pending_tasks(), 0);
        assert_eq!(worker.name(), "unit-worker");
        assert!(worker.stop_and_join());
        assert!(!worker.join());
    }

    #[test]
    fn test_callback_waits_for_owner_drain() {
        let queue = TaskQueue::new();
        let worker = spawn(&queue);
        let delivered = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&delivered);
        worker
            .send_with_callback(|| 42, move |value| *sink.lock() = Some(value))
            .unwrap();

        worker.send_sync(|| 0).unwrap();
        assert!(delivered.lock().is_none());

        assert_eq!(queue.process_all(), 1);
        assert_eq!(*delivered.lock(), Some(42));
        worker.stop_and_join();
    }

    #[test]
    fn test_jobs_keep_submission_order() {
        let queue = TaskQueue::new();
        let worker = spawn(&queue);
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5usize {
            let order = Arc::clone(&order);
            worker
                .send_with_callback(
                    move || {
                        // Earlier jobs sleep longer.
                        thread::sleep(Duration::from_millis((5 - i) as u64));
                        order.lock().push(i);
                        i
                    },
                    |_| {},
                )
                .unwrap();
        }

        worker.send_sync(|| 0).unwrap();
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        worker.stop_and_join();
    }

    #[test]
    fn test_stopped_worker_rejects_jobs() {
        let queue = TaskQueue::new();
        let worker = spawn(&queue);
        worker.stop();

        assert!(!worker.is_running());
        assert!(matches!(
            worker.send_with_callback(|| 1, |_| {}),
            Err(WorkerError::Stopped { .. })
        ));
        assert!(matches!(worker.send_sync(|| 1), Err(WorkerError::Stopped { .. })));
        assert!(worker.join());
    }

    #[test]
    fn test_full_channel_rejects_jobs() {
        let queue = TaskQueue::new();
        let worker = WorkerBuilder::new()
            .name("tiny")
            .queue_capacity(1)
            .build::<usize>(queue.clone())
            .unwrap();

        let (release_tx, release_rx) = bounded::<()>(0);
        let (started_tx, started_rx) = bounded::<()>(0);

        // Park the thread inside a job, then take the only channel slot.
        worker
            .send_with_callback(
                move || {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    0
                },
                |_| {},
            )
            .unwrap();
        started_rx.recv().unwrap();
        worker.send_with_callback(|| 1, |_| {}).unwrap();

        let err = worker.send_with_callback(|| 2, |_| {}).unwrap_err();
        assert!(matches!(err, WorkerError::QueueFull { capacity: 1, .. }));
        assert_eq!(worker.pending_tasks(), 2);

        release_tx.send(()).unwrap();
        while worker.pending_tasks() > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        worker.stop_and_join();
    }
}
