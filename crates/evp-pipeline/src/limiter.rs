//! Bounded-concurrency task limiter
//!
//! Accepts an arbitrary number of tasks over its lifetime but runs at most
//! `max_concurrent` of them at once. Submission never blocks: the permit is
//! acquired inside the spawned task, so a producer can keep submitting while
//! all slots are busy. Tokio's semaphore is FIFO, so queued tasks start in
//! submission order.
//!
//! The limiter holds no session state; it is a pure concurrency primitive
//! reusable across sessions.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Default number of concurrently in-flight validation tasks
pub const DEFAULT_VALIDATION_CONCURRENCY: usize = 5;

/// Concurrency-limited task spawner
#[derive(Debug, Clone)]
pub struct TaskLimiter {
    semaphore: Arc<Semaphore>,
}

impl TaskLimiter {
    /// Create a limiter allowing `max_concurrent` tasks at once
    ///
    /// `max_concurrent` must be at least 1; zero would deadlock every task.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Submit a task, returning a handle for its eventual completion
    ///
    /// Returns immediately; the task waits for a free slot inside its own
    /// spawned future.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::spawn(async move {
            // The limiter never closes the semaphore, so acquisition only
            // ever waits for a free slot
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("task limiter semaphore closed");
            fut.await
        })
    }

    /// Number of currently free slots
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for TaskLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATION_CONCURRENCY)
    }
}
