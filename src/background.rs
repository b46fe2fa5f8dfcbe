//! Background task execution with UI-thread completion delivery.
//!
//! Work runs on a small worker pool; completion callbacks are queued and
//! only executed when the UI thread calls `process_results`. UI state is
//! therefore never touched from a worker, and the UI thread never blocks on
//! a task.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::constants::SYNC_WORKER_COUNT;

/// Result type produced by background work.
pub type TaskResult<T> = Result<T, String>;

type Job = Box<dyn FnOnce() + Send + 'static>;
type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Fixed worker pool with a deferred completion queue.
///
/// Dropping the executor closes the job channel; workers drain what they
/// have and exit.
pub struct BackgroundExecutor {
    job_tx: Sender<Job>,
    completions: Arc<Mutex<Vec<Completion>>>,
    pending: Arc<AtomicUsize>,
}

impl BackgroundExecutor {
    pub fn new(workers: usize) -> Self {
        let (job_tx, job_rx) = channel::<Job>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        for index in 0..workers.max(1) {
            let job_rx = Arc::clone(&job_rx);
            let builder = thread::Builder::new().name(format!("pagemark-background-{index}"));
            let spawned = builder.spawn(move || Self::worker_loop(&job_rx));
            if let Err(error) = spawned {
                warn!(%error, "failed to spawn background worker");
            }
        }

        Self {
            job_tx,
            completions: Arc::new(Mutex::new(Vec::new())),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_default_workers() -> Self {
        Self::new(SYNC_WORKER_COUNT)
    }

    /// Run `work` on a worker thread; queue `on_complete` with its result.
    /// The callback only runs inside `process_results`.
    pub fn spawn<T, W, C>(&self, name: &str, work: W, on_complete: C)
    where
        T: Send + 'static,
        W: FnOnce() -> TaskResult<T> + Send + 'static,
        C: FnOnce(TaskResult<T>) + Send + 'static,
    {
        debug!(task = name, "spawning background task");
        self.pending.fetch_add(1, Ordering::SeqCst);

        let completions = Arc::clone(&self.completions);
        let task_name = name.to_string();
        let job: Job = Box::new(move || {
            let result = std::panic::catch_unwind(AssertUnwindSafe(work))
                .unwrap_or_else(|_| Err(format!("background task '{task_name}' panicked")));
            completions
                .lock()
                .push(Box::new(move || on_complete(result)));
        });

        if self.job_tx.send(job).is_err() {
            warn!(task = name, "background executor is shut down; task dropped");
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Run all queued completion callbacks on the calling thread.
    pub fn process_results(&self) {
        let completions = std::mem::take(&mut *self.completions.lock());
        for completion in completions {
            completion();
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    fn worker_loop(job_rx: &Mutex<Receiver<Job>>) {
        loop {
            let job = {
                let rx = job_rx.lock();
                rx.recv()
            };
            match job {
                Ok(job) => job(),
                Err(_) => break,
            }
        }
    }
}
