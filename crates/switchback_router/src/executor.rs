//! Where matching and handlers run.
//!
//! Matching is pure and may run on any thread. Handlers touch host state and
//! must run on the host's primary thread, so the router hands them to a
//! [`PrimaryExecutor`]. Asynchronous dispatch runs the matching itself on a
//! [`WorkerPool`].

use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use parking_lot::Mutex;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs handler invocations on the host's primary thread.
pub trait PrimaryExecutor: Send + Sync {
    /// Schedules a job. Jobs run in submission order.
    fn execute(&self, job: Job);
}

/// Runs matching off the primary thread.
pub trait WorkerPool: Send + Sync {
    /// Starts a job.
    fn spawn(&self, job: Job);
}

/// Runs every job immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl PrimaryExecutor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// A queue the host drains from its primary loop.
pub struct PrimaryQueue {
    sender: Sender<Job>,
    receiver: Mutex<Receiver<Job>>,
}

impl PrimaryQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Runs every job queued so far. Returns how many ran.
    ///
    /// Jobs queued by a running job are picked up in the same call.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.receiver.lock().try_recv();
            match next {
                Ok(job) => {
                    job();
                    ran += 1;
                }
                Err(_) => return ran,
            }
        }
    }
}

impl Default for PrimaryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimaryExecutor for PrimaryQueue {
    fn execute(&self, job: Job) {
        // The receiver lives as long as the queue, so sending cannot fail.
        let _ = self.sender.send(job);
    }
}

impl fmt::Debug for PrimaryQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryQueue").finish_non_exhaustive()
    }
}

/// Runs every job immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineWorkers;

impl WorkerPool for InlineWorkers {
    fn spawn(&self, job: Job) {
        job();
    }
}

/// A fixed set of named dispatch threads sharing one job channel.
///
/// Threads are started up front and live until the pool is dropped. Jobs
/// beyond the thread count wait in the channel.
pub struct ThreadWorkers {
    sender: Sender<Job>,
    threads: usize,
    submitted: AtomicUsize,
}

impl ThreadWorkers {
    /// Creates a pool with one thread per available core.
    #[must_use]
    pub fn new() -> Self {
        Self::with_threads(thread::available_parallelism().map_or(4, NonZeroUsize::get))
    }

    /// Creates a pool with `count` threads (at least one).
    #[must_use]
    pub fn with_threads(count: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut threads = 0;
        for n in 0..count.max(1) {
            let receiver = Arc::clone(&receiver);
            let started = thread::Builder::new()
                .name(format!("switchback-dispatch-{n}"))
                .spawn(move || work(&receiver));
            match started {
                Ok(_) => threads += 1,
                Err(err) => tracing::error!(error = %err, "could not start a dispatch thread"),
            }
        }
        tracing::debug!(threads, "dispatch pool ready");
        Self {
            sender,
            threads,
            submitted: AtomicUsize::new(0),
        }
    }

    /// Threads that started.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Jobs handed to the pool so far.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Relaxed)
    }
}

fn work(receiver: &Mutex<Receiver<Job>>) {
    loop {
        let next = receiver.lock().recv();
        let Ok(job) = next else {
            return;
        };
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("dispatch job panicked");
        }
    }
}

impl Default for ThreadWorkers {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool for ThreadWorkers {
    fn spawn(&self, job: Job) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        if self.threads == 0 {
            job();
            return;
        }
        if let Err(mpsc::SendError(job)) = self.sender.send(job) {
            tracing::error!("dispatch threads are gone; running inline");
            job();
        }
    }
}

impl fmt::Debug for ThreadWorkers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadWorkers")
            .field("threads", &self.threads)
            .field("submitted", &self.submitted())
            .finish()
    }
}
