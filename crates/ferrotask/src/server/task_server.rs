//! The task server: a fixed pool of worker threads fed by a shared queue.
//!
//! ## Data flow
//!
//! 1. [`TaskServer::submit`] allocates a [`TaskId`] from the [`IdPool`],
//!    pushes `(task, id)` onto the [`PendingQueue`] and wakes one worker.
//! 2. A worker pops the entry, evaluates the task with no lock held and
//!    publishes the outcome into the [`ResultTable`], waking every waiter.
//! 3. [`TaskServer::wait`] blocks until the table holds the id, removes the
//!    entry and recycles the id.
//!
//! The pool, queue and table each own their lock. No code path holds two of
//! them at once, so there is no lock ordering to get wrong.
//!
//! ## Shutdown
//!
//! [`TaskServer::shutdown`] closes the queue and joins every worker. Workers
//! keep popping until the queue is closed *and* empty, so every task accepted
//! before the shutdown still produces a collectable result.
//!
//! [`IdPool`]: crate::IdPool
//! [`PendingQueue`]: crate::PendingQueue
//! [`ResultTable`]: crate::ResultTable

use super::{shared::Shared, worker::worker_loop};
use crate::{
    Error, PendingEntry, Result, Scalar, ServerConfig, ServerState, ServerStats, Task, TaskId,
    TaskResult,
};
use core::time::Duration;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Executes [`Task`]s on a fixed pool of worker threads.
///
/// Any number of client threads may [`submit`](Self::submit) and
/// [`wait`](Self::wait) concurrently through a shared reference. Lifecycle
/// operations ([`start`](Self::start), [`shutdown`](Self::shutdown)) take
/// `&mut self` and belong to the owning thread.
///
/// A running server must be shut down before it is dropped; dropping it while
/// running is a caller error (see the [`Drop`] impl).
///
/// # Example
/// ```
/// use ferrotask::{Task, TaskServer};
///
/// let mut server = TaskServer::<f64>::create(4)?;
///
/// let pow = server.submit(Task::Pow(2.0, 10.0))?;
/// let sqrt = server.submit(Task::Sqrt(16.0))?;
/// let sin = server.submit(Task::Sin(0.0))?;
///
/// assert_eq!(server.wait(sqrt)?, 4.0);
/// assert_eq!(server.wait(sin)?, 0.0);
/// assert_eq!(server.wait(pow)?, 1024.0);
///
/// server.shutdown()?;
/// # Ok::<(), ferrotask::Error>(())
/// ```
#[derive(Debug)]
pub struct TaskServer<T: Scalar> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
    state: ServerState,
    config: ServerConfig,
}

impl<T: Scalar> Default for TaskServer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> TaskServer<T> {
    /// Creates a server in the `Created` state with the default
    /// [`ServerConfig`]. No threads are spawned until [`start`](Self::start).
    pub fn new() -> Self {
        Self::from_config(ServerConfig::default())
    }

    /// Creates a server in the `Created` state that will name and size its
    /// workers according to `config` once started.
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            workers: Vec::new(),
            state: ServerState::Created,
            config,
        }
    }

    /// Creates a server and starts `worker_count` workers.
    ///
    /// # Errors
    /// - [`Error::InvalidWorkerCount`] if `worker_count` is zero.
    /// - [`Error::Spawn`] if a worker thread could not be created.
    pub fn create(worker_count: usize) -> Result<Self> {
        let mut server = Self::new();
        server.start(worker_count)?;
        Ok(server)
    }

    /// Creates a server and starts `config.num_workers` workers.
    ///
    /// # Errors
    /// See [`Self::create`].
    pub fn with_config(config: ServerConfig) -> Result<Self> {
        let worker_count = config.num_workers;
        let mut server = Self::from_config(config);
        server.start(worker_count)?;
        Ok(server)
    }

    /// Spawns `worker_count` workers and moves to `Running`.
    ///
    /// If any spawn fails, the workers spawned so far are stopped and joined
    /// and the server stays in `Created`.
    ///
    /// # Errors
    /// - [`Error::AlreadyStarted`] unless the server is `Created`.
    /// - [`Error::InvalidWorkerCount`] if `worker_count` is zero.
    /// - [`Error::Spawn`] if a worker thread could not be created.
    pub fn start(&mut self, worker_count: usize) -> Result<()> {
        if self.state != ServerState::Created {
            return Err(Error::AlreadyStarted { state: self.state });
        }
        if worker_count == 0 {
            return Err(Error::InvalidWorkerCount);
        }

        self.workers.reserve_exact(worker_count);
        for worker_id in 0..worker_count {
            let mut builder =
                thread::Builder::new().name(format!("{}-{worker_id}", self.config.thread_name));
            if let Some(stack_size) = self.config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let shared = Arc::clone(&self.shared);
            match builder.spawn(move || worker_loop(worker_id, &shared)) {
                Ok(handle) => self.workers.push(handle),
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("Failed to spawn worker {worker_id}: {source}");
                    self.abort_start();
                    return Err(Error::Spawn { source });
                }
            }
        }

        self.config.num_workers = worker_count;
        self.state = ServerState::Running;

        #[cfg(feature = "tracing")]
        tracing::info!("Task server running with {worker_count} workers");
        Ok(())
    }

    // Nothing has been submitted yet, so the partially started pool can be
    // torn down and replaced with fresh shared state.
    fn abort_start(&mut self) {
        self.shared.queue.close();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        self.shared = Arc::new(Shared::new());
    }

    /// Enqueues `task` and returns the identifier to collect its result with.
    ///
    /// Never blocks on task execution. Identifiers stay unique for as long as
    /// they are outstanding, so callers may submit many tasks before waiting
    /// on any of them.
    ///
    /// # Errors
    /// [`Error::NotRunning`] if the server has not been started or has been
    /// shut down.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn submit(&self, task: Task<T>) -> Result<TaskId> {
        if self.state != ServerState::Running {
            return Err(Error::NotRunning { state: self.state });
        }

        let id = self.shared.ids.allocate();
        if let Err(entry) = self.shared.queue.push(PendingEntry { task, id }) {
            self.shared.ids.free(entry.id)?;
            return Err(Error::NotRunning { state: self.state });
        }
        self.shared.counters.record_submitted();
        Ok(id)
    }

    /// Blocks until the result for `id` is ready, then consumes it and
    /// recycles `id`.
    ///
    /// Callers for distinct ids may wait concurrently.
    ///
    /// # Errors
    /// - [`Error::UnknownId`] if `id` is not outstanding, e.g. its result was
    ///   already collected.
    /// - [`Error::Task`] if the task ran and failed.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn wait(&self, id: TaskId) -> Result<T> {
        self.ensure_outstanding(id)?;
        let result = self.shared.results.wait_take(id);
        self.collect(id, result)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    ///
    /// A timed-out wait does not consume anything: the result stays in the
    /// table and `id` stays outstanding for a later call.
    ///
    /// # Errors
    /// As [`wait`](Self::wait), plus [`Error::Timeout`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn wait_timeout(&self, id: TaskId, timeout: Duration) -> Result<T> {
        self.ensure_outstanding(id)?;
        match self.shared.results.wait_take_timeout(id, timeout) {
            Some(result) => self.collect(id, result),
            None => Err(Error::Timeout { id, timeout }),
        }
    }

    /// Collects the result for `id` if it is already available.
    ///
    /// Returns `None` while the task is still pending or running.
    pub fn try_take(&self, id: TaskId) -> Option<Result<T>> {
        if let Err(e) = self.ensure_outstanding(id) {
            return Some(Err(e));
        }
        let result = self.shared.results.take(id)?;
        Some(self.collect(id, result))
    }

    fn ensure_outstanding(&self, id: TaskId) -> Result<()> {
        if self.shared.ids.is_outstanding(id) {
            Ok(())
        } else {
            Err(Error::UnknownId { id })
        }
    }

    // The entry has already been removed from the table, so this caller is
    // the sole owner of `id` until it goes back to the pool.
    fn collect(&self, id: TaskId, result: TaskResult<T>) -> Result<T> {
        self.shared.ids.free(id)?;
        Ok(result?)
    }

    /// Stops accepting tasks, drains the queue and joins every worker.
    ///
    /// Idempotent: calling it on a `Stopped` server is a no-op. Calling it on
    /// a server that was never started moves it straight to `Stopped`.
    /// Results of tasks submitted before the call remain collectable
    /// afterwards.
    ///
    /// # Errors
    /// - [`Error::CalledFromWorker`] if invoked on a worker thread.
    /// - [`Error::WorkerPanicked`] if a worker panicked. The server is still
    ///   `Stopped` afterwards.
    pub fn shutdown(&mut self) -> Result<()> {
        match self.state {
            ServerState::Stopped => return Ok(()),
            ServerState::Created => {
                self.shared.queue.close();
                self.state = ServerState::Stopped;
                return Ok(());
            }
            ServerState::Running | ServerState::Stopping => {}
        }

        let current = thread::current().id();
        if self.workers.iter().any(|h| h.thread().id() == current) {
            return Err(Error::CalledFromWorker);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Shutting down task server ({} tasks still queued)",
            self.shared.queue.len()
        );
        self.state = ServerState::Stopping;
        self.shared.queue.close();

        let mut panicked = 0;
        for (_worker_id, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {_worker_id} panicked");
                panicked += 1;
            }
        }

        self.state = ServerState::Stopped;
        #[cfg(feature = "tracing")]
        tracing::info!("Task server stopped");

        if panicked > 0 {
            return Err(Error::WorkerPanicked { panicked });
        }
        Ok(())
    }

    pub const fn state(&self) -> ServerState {
        self.state
    }

    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Number of live worker threads.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn stats(&self) -> ServerStats {
        let (submitted, completed, failed) = self.shared.counters.snapshot();
        ServerStats {
            submitted,
            completed,
            failed,
            pending: self.shared.queue.len(),
            ready: self.shared.results.len(),
            outstanding: self.shared.ids.outstanding(),
        }
    }
}

/// Dropping a `Created` or `Stopped` server is silent.
///
/// Dropping a server that is still running is a caller error: the error is
/// logged, the queue is closed so the detached workers drain it and exit on
/// their own, and debug builds panic (unless the thread is already
/// unwinding).
impl<T: Scalar> Drop for TaskServer<T> {
    fn drop(&mut self) {
        if matches!(self.state, ServerState::Created | ServerState::Stopped) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::error!(
            "TaskServer dropped while {}; call shutdown() first",
            self.state
        );
        self.shared.queue.close();

        if cfg!(debug_assertions) && !thread::panicking() {
            panic!(
                "TaskServer dropped while {}; call shutdown() first",
                self.state
            );
        }
    }
}
