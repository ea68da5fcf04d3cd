//! Core systems for expandable lists.
//!
//! This crate provides the plumbing that the expandable list adapter is built on:
//!
//! - **Signal/Slot System**: Type-safe change notifications between the adapter and its host
//! - **Task Queue**: Work posted from any thread, drained on the owning (UI) thread
//! - **Worker**: A dedicated background thread processing tasks sequentially
//! - **Owner Thread**: Checks that view-facing operations stay on the thread that owns the list
//! - **Logging**: `tracing` targets and span helpers for each subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use expandable_list_core::Signal;
//!
//! let item_changed = Signal::<usize>::new();
//!
//! let conn_id = item_changed.connect(|row| {
//!     println!("Row {} needs a refresh", row);
//! });
//!
//! item_changed.emit(3);
//! item_changed.disconnect(conn_id);
//! ```
//!
//! # Worker Example
//!
//! ```
//! use expandable_list_core::{TaskQueue, Worker, WorkerConfig};
//!
//! let queue = TaskQueue::new();
//! let worker = Worker::<usize>::with_config(WorkerConfig::with_name("bulk"), queue.clone())
//!     .expect("spawn worker");
//!
//! worker
//!     .send_with_callback(|| 40 + 2, |answer| println!("answer: {}", answer))
//!     .expect("queue task");
//!
//! // Wait for the worker, then deliver the callback on this thread.
//! worker.send_sync(|| 0).expect("barrier");
//! queue.process_all();
//!
//! worker.stop_and_join();
//! ```

mod error;
pub mod logging;
pub mod owner;
pub mod signal;
mod task;
pub mod worker;

pub use error::{Result, WorkerError};
pub use logging::PerfSpan;
pub use owner::OwnerThread;
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
pub use worker::{Worker, WorkerBuilder, WorkerConfig};
