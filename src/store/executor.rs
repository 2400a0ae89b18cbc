//! Task submission abstraction used for dispatch workers and notification
//! delivery.
//!
//! `execute` never waits for the task to run (except for
//! [`ImmediateExecutor`], which runs it inline). Tasks submitted to one
//! executor run in submission order.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread;

use parking_lot::Mutex;

use super::error::StoreError;

/// A unit of work handed to an executor.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs submitted tasks, in submission order.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

impl<F> Executor for F
where
    F: Fn(Task) + Send + Sync,
{
    fn execute(&self, task: Task) {
        self(task)
    }
}

/// Runs every task on the calling thread before `execute` returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateExecutor;

impl Executor for ImmediateExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}

/// A single dedicated, named worker thread draining a FIFO queue.
///
/// The thread exits once the executor is dropped and the queue is empty.
pub struct WorkerExecutor {
    name: String,
    sender: Mutex<mpsc::Sender<Task>>,
}

impl WorkerExecutor {
    pub fn spawn(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        let (sender, receiver) = mpsc::channel::<Task>();

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    task();
                }
            })
            .map_err(|source| StoreError::WorkerSpawn {
                name: name.clone(),
                source,
            })?;

        tracing::debug!(worker = %name, "Dispatch worker started");

        Ok(Self {
            name,
            sender: Mutex::new(sender),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until every task submitted before this call has run.
    ///
    /// Must not be called from the worker thread itself.
    pub fn wait_idle(&self) {
        let (done_tx, done_rx) = mpsc::sync_channel::<()>(1);
        self.execute(Box::new(move || {
            let _ = done_tx.send(());
        }));
        let _ = done_rx.recv();
    }
}

impl Executor for WorkerExecutor {
    fn execute(&self, task: Task) {
        if self.sender.lock().send(task).is_err() {
            tracing::warn!(worker = %self.name, "Dispatch worker is gone, task dropped");
        }
    }
}

impl std::fmt::Debug for WorkerExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerExecutor")
            .field("name", &self.name)
            .finish()
    }
}

/// Queues tasks until the owning loop calls [`QueueExecutor::run_pending`].
///
/// Models a UI-affinity thread: notifications pile up here and are delivered
/// wherever the owner drains them.
#[derive(Default)]
pub struct QueueExecutor {
    tasks: Mutex<VecDeque<Task>>,
}

impl QueueExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run queued tasks, including ones queued while draining.
    /// Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.lock().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }
}

impl Executor for QueueExecutor {
    fn execute(&self, task: Task) {
        self.tasks.lock().push_back(task);
    }
}
