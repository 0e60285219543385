//! Blocking front end for async work.
//!
//! A [`Worker`] owns one OS thread running a tokio current-thread runtime for
//! its whole lifetime. [`Worker::run`] ships a future to that thread and blocks
//! the caller until the future has finished. Jobs run one at a time, in the
//! order they were submitted, no matter how many threads submit them.

use std::future::Future;
use std::pin::Pin;
use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::{FplError, Result};

/// Thread name given to the worker unless the caller picks one.
pub const WORKER_THREAD_NAME: &str = "fpl-worker";

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Debug)]
pub struct Worker {
    jobs: Option<mpsc::UnboundedSender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn() -> Result<Self> {
        Self::spawn_named(WORKER_THREAD_NAME)
    }

    pub fn spawn_named(name: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();

        let thread = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                debug!("worker thread started");
                runtime.block_on(async move {
                    while let Some(job) = queue.recv().await {
                        job.await;
                    }
                });
                // Dropping the runtime here cancels anything a job left spawned.
                drop(runtime);
                debug!("worker thread stopped");
            })?;

        Ok(Self {
            jobs: Some(jobs),
            thread: Some(thread),
        })
    }

    /// Run `future` on the worker thread and wait for its result.
    ///
    /// Must not be called from inside an async context: the calling thread is
    /// blocked until the job completes.
    pub fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::pin(async move {
            // The caller only goes away if it panicked; nothing to report to.
            let _ = reply.send(future.await);
        });

        self.jobs
            .as_ref()
            .ok_or(FplError::WorkerUnavailable)?
            .send(job)
            .map_err(|_| FplError::WorkerUnavailable)?;

        response
            .blocking_recv()
            .map_err(|_| FplError::WorkerUnavailable)?
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the queue lets the worker finish pending jobs and exit.
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_run_returns_future_output() {
        let worker = Worker::spawn().unwrap();
        let value = worker.run(async { Ok(21 * 2) }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_run_propagates_errors() {
        let worker = Worker::spawn().unwrap();
        let err = worker
            .run(async { Err::<(), _>(FplError::NotLoggedIn) })
            .unwrap_err();
        assert!(matches!(err, FplError::NotLoggedIn));
    }

    #[test]
    fn test_jobs_run_on_the_worker_thread() {
        let worker = Worker::spawn_named("bridge-test").unwrap();

        let first = worker
            .run(async { Ok(std::thread::current().id()) })
            .unwrap();
        let second = worker
            .run(async { Ok(std::thread::current().name().map(str::to_string)) })
            .unwrap();

        assert_ne!(first, std::thread::current().id());
        assert_eq!(second.as_deref(), Some("bridge-test"));
    }

    #[test]
    fn test_concurrent_callers_are_serialized() {
        let worker = Arc::new(Worker::spawn().unwrap());
        let running = Arc::new(AtomicUsize::new(0));
        let max_running = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let worker = Arc::clone(&worker);
                let running = Arc::clone(&running);
                let max_running = Arc::clone(&max_running);
                std::thread::spawn(move || {
                    worker.run(async move {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        max_running.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        running.fetch_sub(1, Ordering::SeqCst);
                        Ok(i)
                    })
                })
            })
            .collect();

        let mut results: Vec<i32> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        results.sort();

        assert_eq!(results, (0..8).collect::<Vec<_>>());
        assert_eq!(max_running.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_job_makes_worker_unavailable() {
        let worker = Worker::spawn().unwrap();

        let err = worker
            .run(async {
                if true {
                    panic!("boom");
                }
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, FplError::WorkerUnavailable));

        let err = worker.run(async { Ok(1) }).unwrap_err();
        assert!(matches!(err, FplError::WorkerUnavailable));
    }

    #[test]
    fn test_drop_shuts_down_the_runtime() {
        let held = Arc::new(());
        let worker = Worker::spawn().unwrap();

        let in_task = Arc::clone(&held);
        worker
            .run(async move {
                tokio::spawn(async move {
                    let _held = in_task;
                    std::future::pending::<()>().await;
                });
                Ok(())
            })
            .unwrap();
        assert_eq!(Arc::strong_count(&held), 2);

        drop(worker);
        assert_eq!(Arc::strong_count(&held), 1);
    }
}
