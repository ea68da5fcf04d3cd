//! Integration tests for the worker -> task queue -> signal hop.

use std::sync::Arc;
use std::thread::ThreadId;

use expandable_list_core::{OwnerThread, Signal, TaskQueue, Worker, WorkerConfig};
use parking_lot::Mutex;

#[test]
fn worker_result_is_emitted_on_owner_thread() {
    let owner = OwnerThread::capture();
    let queue = TaskQueue::new();
    let worker = Worker::<(ThreadId, usize)>::with_config(WorkerConfig::with_name("hop"), queue.clone())
        .expect("spawn worker");

    let finished = Arc::new(Signal::<usize>::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = seen.clone();
    finished.connect(move |&count| {
        seen_clone.lock().push((std::thread::current().id(), count));
    });

    let signal = finished.clone();
    worker
        .send_with_callback(
            || (std::thread::current().id(), 5),
            move |(worker_thread, count)| {
                assert_ne!(worker_thread, std::thread::current().id());
                signal.emit(count);
            },
        )
        .expect("queue task");

    worker.send_sync(|| (std::thread::current().id(), 0)).expect("barrier");
    assert!(seen.lock().is_empty());

    assert_eq!(queue.process_all(), 1);
    assert_eq!(*seen.lock(), vec![(owner.id(), 5)]);

    assert!(worker.stop_and_join());
}

#[test]
fn shared_state_is_serialized_through_one_worker() {
    let queue = TaskQueue::new();
    let worker = Worker::<usize>::with_config(WorkerConfig::default(), queue.clone()).expect("spawn worker");
    let flags = Arc::new(Mutex::new(vec![false; 8]));

    for target in [true, false, true] {
        let flags = flags.clone();
        worker
            .send_with_callback(
                move || {
                    let mut flags = flags.lock();
                    flags.iter_mut().for_each(|flag| *flag = target);
                    flags.len()
                },
                |_| {},
            )
            .expect("queue task");
    }

    worker.send_sync(|| 0).expect("barrier");
    assert!(flags.lock().iter().all(|&flag| flag));
    assert_eq!(queue.process_all(), 3);
    worker.stop_and_join();
}
